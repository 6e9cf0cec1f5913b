//! # ARTBot Store
//!
//! Persistent queue of submitted artpieces and the bacterial colors they
//! are painted with. A print run reads and updates the queue inside one
//! transaction so that a failed run leaves every artpiece untouched.

pub mod error;
pub mod memory;
pub mod model;
pub mod sqlite;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, MemoryTransaction};
pub use model::NewArtpiece;
pub use sqlite::{SqliteStore, SqliteTransaction};
pub use traits::{ArtpieceStore, PrintableQuery, StoreTransaction};
