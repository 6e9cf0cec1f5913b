//! # ARTBot
//!
//! Turns pixel art submitted by the public into a procedure that an
//! Opentrons liquid-handling robot runs to paint the art with bacterial
//! cultures on agar canvases.
//!
//! ## Architecture
//!
//! ARTBot is organized as a workspace with multiple crates:
//!
//! 1. **artbot-core** - Artpiece, color and plate geometry types
//! 2. **artbot-planner** - Coordinate mapping, print ordering, procedure assembly and rendering
//! 3. **artbot-store** - Transactional artpiece queue (SQLite or in memory)
//! 4. **artbot-settings** - Configuration files and validation
//! 5. **artbot** - Batch runner and command line interface
//!
//! A print run selects the oldest confirmed submissions, plans one
//! procedure for the whole batch, writes it to disk and marks the
//! artpieces processed. A run either completes or changes nothing.

pub mod report;
pub mod runner;

pub use artbot_core::{Artpiece, ArtpieceId, BacterialColor, SubmissionStatus};
pub use artbot_settings::{Config, OutputFormat};
pub use report::RunReport;
pub use runner::{procedure_file_name, BatchRequest, ProcedureRunner, RunOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout only carries command results
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
