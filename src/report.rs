//! Human-readable log of what a print run did.

use artbot_core::Artpiece;
use artbot_planner::ProcedurePlan;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    lines: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn nothing_to_do() -> Self {
        let mut report = Self::new();
        report.push("No new art found. All done.");
        report
    }

    pub(crate) fn loaded(&mut self, artpieces: &[Artpiece]) {
        self.push(format!("Loaded {} pieces of art", artpieces.len()));
        for artpiece in artpieces {
            self.push(format!(
                "{}: {}, {}",
                artpiece.id, artpiece.title, artpiece.submit_date
            ));
        }
    }

    pub(crate) fn generated(&mut self, plan: &ProcedurePlan) {
        self.push("Successfully generated artistic procedure");
        self.push("The following slots will be used:");
        for (slug, slot) in &plan.canvas_locations {
            self.push(format!("Slot {}: \"{}\"", slot, slug));
        }
        self.push("Fill the palette as follows:");
        self.lines.extend(plan.palette_instructions());
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
