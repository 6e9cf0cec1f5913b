//! Jupyter notebook renderer
//!
//! Wraps the Python protocol in an nbformat 4 notebook so it can be run
//! cell by cell from the robot's Jupyter server.

use super::python::PythonTemplateRenderer;
use super::ProcedureRenderer;
use crate::error::PlannerResult;
use crate::procedure::ProcedurePlan;
use serde_json::{json, Value};

const NOTEBOOK_RUNNER: &str = "import opentrons.execute\n\
protocol = opentrons.execute.get_protocol_api('2.0')\n\
protocol.home()\n\
run(protocol)";

/// Renders plans into a Jupyter notebook (`.ipynb`)
#[derive(Debug, Clone, Default)]
pub struct NotebookRenderer {
    protocol: PythonTemplateRenderer,
}

impl NotebookRenderer {
    /// Notebook around the built-in protocol template
    pub fn new() -> Self {
        Self::default()
    }

    /// Notebook around a custom protocol template
    pub fn with_protocol(protocol: PythonTemplateRenderer) -> Self {
        Self { protocol }
    }

    fn summary(plan: &ProcedurePlan) -> String {
        let mut lines = vec![
            "# ARTBot print run".to_string(),
            String::new(),
            "| Slot | Artpiece | Title |".to_string(),
            "|---|---|---|".to_string(),
        ];
        lines.extend(
            plan.artpieces
                .iter()
                .map(|a| format!("| {} | `{}` | {} |", a.slot, a.slug, a.title)),
        );
        lines.push(String::new());
        lines.push("Palette:".to_string());
        lines.push(String::new());
        lines.extend(
            plan.palette_instructions()
                .into_iter()
                .map(|line| format!("- {}", line)),
        );
        lines.join("\n")
    }
}

/// Notebook cells store their source as a list of lines that keep their `\n`
fn source_lines(text: &str) -> Value {
    Value::Array(
        text.split_inclusive('\n')
            .map(|line| Value::String(line.to_string()))
            .collect(),
    )
}

impl ProcedureRenderer for NotebookRenderer {
    fn name(&self) -> &'static str {
        "notebook"
    }

    fn extension(&self) -> &'static str {
        "ipynb"
    }

    fn render(&self, plan: &ProcedurePlan) -> PlannerResult<String> {
        let protocol = self.protocol.render(plan)?;

        let notebook = json!({
            "cells": [
                {
                    "cell_type": "markdown",
                    "metadata": {},
                    "source": source_lines(&Self::summary(plan)),
                },
                {
                    "cell_type": "code",
                    "execution_count": null,
                    "metadata": {},
                    "outputs": [],
                    "source": source_lines(&protocol),
                },
                {
                    "cell_type": "code",
                    "execution_count": null,
                    "metadata": {},
                    "outputs": [],
                    "source": source_lines(NOTEBOOK_RUNNER),
                },
            ],
            "metadata": {
                "kernelspec": {
                    "display_name": "Python 3",
                    "language": "python",
                    "name": "python3",
                },
                "language_info": { "name": "python" },
            },
            "nbformat": 4,
            "nbformat_minor": 4,
        });

        Ok(serde_json::to_string_pretty(&notebook)?)
    }
}
