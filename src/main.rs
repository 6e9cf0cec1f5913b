//! artbot - builds print procedures for the ARTBot
//!
//! Usage:
//!   artbot generate               Plan the next batch and write its procedure
//!   artbot generate --ids 4,7     Only consider these artpieces
//!   artbot generate --notebook    Write a Jupyter notebook instead of a protocol
//!   artbot queue                  List artpieces waiting to be printed

use anyhow::{Context, Result};
use artbot::{init_logging, ArtpieceId, BatchRequest, Config, OutputFormat, ProcedureRunner};
use artbot_store::{ArtpieceStore, SqliteStore};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "artbot")]
#[command(about = "Builds Opentrons procedures that print submitted pixel art")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database url, overrides the configuration and DATABASE_URL
    #[arg(long, global = true, value_name = "URL")]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the next batch, write its procedure and mark it processed
    Generate(GenerateArgs),
    /// List artpieces waiting to be printed
    Queue,
}

#[derive(Args)]
struct GenerateArgs {
    /// Only consider these artpiece ids
    #[arg(long, value_delimiter = ',', value_name = "ID,...")]
    ids: Vec<i64>,

    /// Maximum number of artpieces in the batch
    #[arg(short = 'n', long, value_name = "N")]
    num_pieces: Option<usize>,

    /// Write a Jupyter notebook (same as --format notebook)
    #[arg(long, conflicts_with = "format")]
    notebook: bool,

    /// Output format: python, notebook or json
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Palette labware name
    #[arg(long, value_name = "NAME")]
    palette: Option<String>,

    /// Pipette name
    #[arg(long, value_name = "NAME")]
    pipette: Option<String>,

    /// Directory the procedure is written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Protocol template replacing the built-in one
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,
}

impl GenerateArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(num_pieces) = self.num_pieces {
            config.batch.num_pieces = num_pieces;
        }
        if self.notebook {
            config.output.format = OutputFormat::Notebook;
        } else if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(palette) = &self.palette {
            config.labware.palette = palette.clone();
        }
        if let Some(pipette) = &self.pipette {
            config.labware.pipette = pipette.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(template) = &self.template {
            config.output.template = Some(template.clone());
        }
    }

    fn request(&self, config: &Config) -> BatchRequest {
        let request = BatchRequest::new(config.batch.num_pieces);
        if self.ids.is_empty() {
            request
        } else {
            request.with_ids(self.ids.iter().copied().map(ArtpieceId).collect())
        }
    }
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.database.sqlite_path()?;
    SqliteStore::open(&path)
        .with_context(|| format!("Failed to open database {}", path.display()))
}

fn cmd_generate(mut config: Config, args: GenerateArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let mut store = open_store(&config)?;
    let runner = ProcedureRunner::from_config(&config)?;
    let outcome = runner.run(&mut store, &args.request(&config))?;

    print!("{}", outcome.report());
    if let Some(path) = outcome.path() {
        println!("Procedure written to {}", path.display());
    }
    Ok(())
}

fn cmd_queue(config: &Config) -> Result<()> {
    let mut store = open_store(config)?;
    let jobs = store
        .pending_jobs()
        .context("Failed to load the print queue")?;

    if jobs.is_empty() {
        println!("The print queue is empty");
        return Ok(());
    }
    for job in &jobs {
        println!(
            "{}: {}, {} [{}] {} pixels",
            job.id,
            job.title,
            job.submit_date,
            job.status,
            job.art.pixel_count()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(url) = cli.database {
        config.database.url = Some(url);
    }

    match cli.command {
        Commands::Generate(args) => cmd_generate(config, args),
        Commands::Queue => cmd_queue(&config),
    }
}
