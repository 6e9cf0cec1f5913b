//! Batch runner
//!
//! Selects a batch from the queue, plans and renders one procedure for
//! it, writes the procedure file and marks the batch processed. All queue
//! changes happen in one store transaction and the file only lands in the
//! output directory once rendering succeeded, so a failed run leaves
//! neither a changed queue nor a partial file behind.

use crate::report::RunReport;
use anyhow::{ensure, Context, Result};
use artbot_core::ArtpieceId;
use artbot_planner::{
    CanvasLocationMap, CanvasSlotAllocator, LabwareSelection, LabwareSpec, NotebookRenderer,
    PlanJsonRenderer, ProcedureAssembler, ProcedureRenderer, PythonTemplateRenderer,
};
use artbot_settings::{Config, OutputFormat};
use artbot_store::{ArtpieceStore, PrintableQuery, StoreTransaction};
use chrono::{Local, NaiveDateTime};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Which artpieces a run should consider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// Only these artpieces, if set
    pub ids: Option<Vec<ArtpieceId>>,
    /// Maximum batch size
    pub num_pieces: usize,
}

impl BatchRequest {
    pub fn new(num_pieces: usize) -> Self {
        Self {
            ids: None,
            num_pieces,
        }
    }

    pub fn with_ids(mut self, ids: Vec<ArtpieceId>) -> Self {
        self.ids = Some(ids);
        self
    }

    fn query(&self) -> PrintableQuery {
        PrintableQuery {
            ids: self.ids.clone(),
            limit: Some(self.num_pieces),
        }
    }
}

/// What a run did
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The queue had nothing printable
    NothingToDo { report: RunReport },
    /// A procedure was written and its artpieces marked processed
    Generated {
        path: PathBuf,
        canvas_locations: CanvasLocationMap,
        report: RunReport,
    },
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            Self::NothingToDo { report } | Self::Generated { report, .. } => report,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NothingToDo { .. } => None,
            Self::Generated { path, .. } => Some(path),
        }
    }
}

/// `ARTISTIC_PROCEDURE_<YYYYmmdd-HHMMSS>.<extension>`
pub fn procedure_file_name(time: NaiveDateTime, extension: &str) -> String {
    format!(
        "ARTISTIC_PROCEDURE_{}.{}",
        time.format("%Y%m%d-%H%M%S"),
        extension
    )
}

/// Runs print batches against a store
pub struct ProcedureRunner<R> {
    assembler: ProcedureAssembler,
    renderer: R,
    output_dir: PathBuf,
    timestamp: Option<NaiveDateTime>,
}

impl ProcedureRunner<Box<dyn ProcedureRenderer>> {
    /// Runner for the labware, slots, template and format in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let labware = LabwareSpec::resolve(&LabwareSelection {
            palette: config.labware.palette.clone(),
            pipette: config.labware.pipette.clone(),
        })?;
        let slots = CanvasSlotAllocator::new(config.batch.canvas_slots.clone())?;

        let protocol = match &config.output.template {
            Some(path) => PythonTemplateRenderer::from_file(path)
                .with_context(|| format!("Failed to load template {}", path.display()))?,
            None => PythonTemplateRenderer::new(),
        };
        let renderer: Box<dyn ProcedureRenderer> = match config.output.format {
            OutputFormat::Python => Box::new(protocol),
            OutputFormat::Notebook => Box::new(NotebookRenderer::with_protocol(protocol)),
            OutputFormat::Json => Box::new(PlanJsonRenderer),
        };

        Ok(Self::new(
            ProcedureAssembler::new(labware).with_slots(slots),
            renderer,
            config.output.directory.clone(),
        ))
    }
}

impl<R: ProcedureRenderer> ProcedureRunner<R> {
    pub fn new(assembler: ProcedureAssembler, renderer: R, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            assembler,
            renderer,
            output_dir: output_dir.into(),
            timestamp: None,
        }
    }

    /// Name output files after `timestamp` instead of the current local time
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Run one batch
    pub fn run<S: ArtpieceStore>(&self, store: &mut S, request: &BatchRequest) -> Result<RunOutcome> {
        ensure!(request.num_pieces > 0, "A batch needs at least one artpiece");
        ensure!(
            request.num_pieces <= self.assembler.capacity(),
            "Batch of {} artpieces does not fit on {} canvas slots",
            request.num_pieces,
            self.assembler.capacity()
        );

        let mut tx = store
            .transaction()
            .context("Failed to start print run transaction")?;

        let artpieces = tx
            .select_printable(&request.query())
            .context("Failed to load printable artpieces")?;
        if artpieces.is_empty() {
            info!("No new art found");
            return Ok(RunOutcome::NothingToDo {
                report: RunReport::nothing_to_do(),
            });
        }

        let mut report = RunReport::new();
        report.loaded(&artpieces);
        info!("Loaded {} pieces of art", artpieces.len());

        let colors = tx.colors().context("Failed to load colors")?;
        let plan = self
            .assembler
            .assemble(&artpieces, &colors)
            .context("Failed to plan procedure")?;
        debug!(
            "Planned {} pixels in {} colors",
            plan.pixel_count(),
            plan.pixels_by_color.len()
        );

        let text = self
            .renderer
            .render(&plan)
            .with_context(|| format!("Failed to render {} procedure", self.renderer.name()))?;

        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })?;
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| Local::now().naive_local());
        let path = self
            .output_dir
            .join(procedure_file_name(timestamp, self.renderer.extension()));

        let mut staged = NamedTempFile::new_in(&self.output_dir)
            .context("Failed to create temporary procedure file")?;
        staged
            .write_all(text.as_bytes())
            .and_then(|_| staged.flush())
            .context("Failed to write procedure")?;

        let ids: Vec<ArtpieceId> = artpieces.iter().map(|a| a.id).collect();
        tx.mark_processed(&ids)
            .context("Failed to mark artpieces processed")?;

        staged
            .persist_noclobber(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if let Err(e) = tx.commit() {
            warn!("Commit failed, removing {}", path.display());
            if let Err(remove_err) = std::fs::remove_file(&path) {
                warn!("Failed to remove {}: {}", path.display(), remove_err);
            }
            return Err(e).context("Failed to commit print run");
        }

        info!(
            "Wrote {} procedure for {} artpieces to {}",
            self.renderer.name(),
            ids.len(),
            path.display()
        );
        report.generated(&plan);

        Ok(RunOutcome::Generated {
            path,
            canvas_locations: plan.canvas_locations,
            report,
        })
    }
}
