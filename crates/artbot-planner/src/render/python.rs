//! Opentrons Python protocol renderer
//!
//! Fills a protocol template by replacing fixed marker tokens with Python
//! literals built from the plan. Every marker must occur exactly once.

use super::ProcedureRenderer;
use crate::error::{PlannerResult, TemplateError, TemplateResult};
use crate::procedure::ProcedurePlan;
use artbot_core::PlateCoordinate;
use std::fmt::Write as _;
use std::path::Path;

/// Protocol template shipped with ARTBot
pub const BUILTIN_TEMPLATE: &str = include_str!("../../templates/ART_TEMPLATE.py");

/// Substitution markers understood by the template renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateToken {
    Palette,
    Pipette,
    Tiprack,
    CanvasLocations,
    Pixels,
    Colors,
}

impl TemplateToken {
    /// All markers a template must contain
    pub const ALL: [TemplateToken; 6] = [
        Self::Palette,
        Self::Pipette,
        Self::Tiprack,
        Self::CanvasLocations,
        Self::Pixels,
        Self::Colors,
    ];

    /// Marker text as written in the template
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Palette => "%%PALETTE GOES HERE%%",
            Self::Pipette => "%%PIPETTE GOES HERE%%",
            Self::Tiprack => "%%TIPRACK GOES HERE%%",
            Self::CanvasLocations => "%%CANVAS LOCATIONS GO HERE%%",
            Self::Pixels => "%%PIXELS GO HERE%%",
            Self::Colors => "%%COLORS GO HERE%%",
        }
    }

    /// Replacement text for this marker.
    ///
    /// Labware names sit inside quotes in the template, so they are inserted
    /// raw; the data markers become Python literals.
    fn value(&self, plan: &ProcedurePlan) -> String {
        match self {
            Self::Palette => plan.labware.palette.clone(),
            Self::Pipette => plan.labware.pipette.clone(),
            Self::Tiprack => plan.labware.tiprack.clone(),
            Self::CanvasLocations => py_dict(
                plan.canvas_locations
                    .iter()
                    .map(|(slug, slot)| (py_str(slug), py_str(slot))),
            ),
            Self::Pixels => py_dict(plan.pixels_by_color.iter().map(|(color, by_slug)| {
                let inner = py_dict(
                    by_slug
                        .iter()
                        .map(|(slug, path)| (py_str(slug), py_path(path))),
                );
                (py_str(color.as_str()), inner)
            })),
            Self::Colors => py_dict(
                plan.color_map
                    .iter()
                    .map(|(color, name)| (py_str(color.as_str()), py_str(name))),
            ),
        }
    }
}

/// Renders plans into an Opentrons protocol (`.py`)
#[derive(Debug, Clone)]
pub struct PythonTemplateRenderer {
    template: String,
}

impl Default for PythonTemplateRenderer {
    fn default() -> Self {
        Self {
            template: BUILTIN_TEMPLATE.to_string(),
        }
    }
}

impl PythonTemplateRenderer {
    /// Renderer using the built-in template
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer using a custom template, checked for its markers up front
    pub fn with_template(template: impl Into<String>) -> TemplateResult<Self> {
        let template = template.into();
        validate_template(&template)?;
        Ok(Self { template })
    }

    /// Renderer using a template file
    pub fn from_file(path: &Path) -> TemplateResult<Self> {
        Self::with_template(std::fs::read_to_string(path)?)
    }
}

impl ProcedureRenderer for PythonTemplateRenderer {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn render(&self, plan: &ProcedurePlan) -> PlannerResult<String> {
        let mut markers = validate_template(&self.template)?;
        markers.sort_by_key(|(position, _)| *position);

        // Stitch in a single pass so inserted text is never rescanned for markers
        let mut out = String::with_capacity(self.template.len());
        let mut cursor = 0;
        for (position, token) in markers {
            out.push_str(&self.template[cursor..position]);
            out.push_str(&token.value(plan));
            cursor = position + token.marker().len();
        }
        out.push_str(&self.template[cursor..]);

        Ok(out)
    }
}

/// Check every marker occurs exactly once and return their byte offsets
fn validate_template(template: &str) -> TemplateResult<Vec<(usize, TemplateToken)>> {
    TemplateToken::ALL
        .iter()
        .map(|token| {
            let found: Vec<usize> = template
                .match_indices(token.marker())
                .map(|(i, _)| i)
                .collect();
            match found.as_slice() {
                [position] => Ok((*position, *token)),
                _ => Err(TemplateError::TokenCount {
                    token: token.marker().to_string(),
                    found: found.len(),
                }),
            }
        })
        .collect()
}

/// Single-quoted Python string literal
pub fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Python float literal
pub fn py_float(v: f64) -> String {
    if v.is_nan() {
        "float('nan')".to_string()
    } else if v.is_infinite() {
        if v > 0.0 {
            "float('inf')".to_string()
        } else {
            "-float('inf')".to_string()
        }
    } else {
        format!("{:?}", v)
    }
}

/// Python list of `(x, y)` tuples
pub fn py_path(path: &[PlateCoordinate]) -> String {
    let items: Vec<String> = path
        .iter()
        .map(|c| format!("({}, {})", py_float(c.x), py_float(c.y)))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Python dict literal from already-rendered keys and values
pub fn py_dict(entries: impl Iterator<Item = (String, String)>) -> String {
    let items: Vec<String> = entries.map(|(k, v)| format!("{}: {}", k, v)).collect();
    format!("{{{}}}", items.join(", "))
}
