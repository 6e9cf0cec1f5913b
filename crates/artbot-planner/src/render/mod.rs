//! Procedure renderers
//!
//! A renderer turns a [`ProcedurePlan`] into the text of one output
//! document. Planning never depends on the output format, so new robot
//! targets only need a new renderer.

pub mod json;
pub mod notebook;
pub mod python;

pub use json::PlanJsonRenderer;
pub use notebook::NotebookRenderer;
pub use python::{PythonTemplateRenderer, TemplateToken};

use crate::error::PlannerResult;
use crate::procedure::ProcedurePlan;

/// Emits a procedure document for a plan
pub trait ProcedureRenderer {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// File extension of the rendered document, without the dot
    fn extension(&self) -> &'static str;

    /// Render the document text
    fn render(&self, plan: &ProcedurePlan) -> PlannerResult<String>;
}

impl<R: ProcedureRenderer + ?Sized> ProcedureRenderer for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn render(&self, plan: &ProcedurePlan) -> PlannerResult<String> {
        (**self).render(plan)
    }
}
