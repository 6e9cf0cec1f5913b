use super::ProcedureRenderer;
use crate::error::PlannerResult;
use crate::procedure::ProcedurePlan;

/// Writes the plan itself as pretty JSON, for other tooling or inspection
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanJsonRenderer;

impl ProcedureRenderer for PlanJsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, plan: &ProcedurePlan) -> PlannerResult<String> {
        Ok(serde_json::to_string_pretty(plan)?)
    }
}
