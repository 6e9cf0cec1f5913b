//! # ARTBot Planner
//!
//! Turns batches of submitted pixel art into printable procedures for an
//! Opentrons liquid-handling robot.
//!
//! ## Pipeline
//!
//! - **Coordinate Mapper**: drawing-grid pixels to plate coordinates in well radii
//! - **Print-Order Optimizer**: greedy nearest-neighbor ordering of each color's pixels
//! - **Canvas Slot Allocator**: one deck slot per canvas, in batch order
//! - **Procedure Assembler**: groups ordered pixels by color across the batch
//!
//! ## Output
//!
//! - **Python protocol**: Opentrons protocol filled from a template
//! - **Notebook**: the same protocol as a Jupyter notebook
//! - **JSON plan**: the structured plan for inspection

pub mod error;
pub mod labware;
pub mod optimizer;
pub mod plate_map;
pub mod procedure;
pub mod render;
pub mod slots;

pub use error::{PlannerError, PlannerResult, TemplateError, TemplateResult};
pub use labware::{LabwareSelection, LabwareSpec};
pub use optimizer::PrintOrderOptimizer;
pub use plate_map::CoordinateMapper;
pub use procedure::{
    ColorNameMap, ColorPixelMap, PathSummary, PlannedArtpiece, ProcedureAssembler, ProcedurePlan,
};
pub use render::{
    NotebookRenderer, PlanJsonRenderer, ProcedureRenderer, PythonTemplateRenderer, TemplateToken,
};
pub use slots::{CanvasLocationMap, CanvasSlotAllocator, DEFAULT_CANVAS_SLOTS};
