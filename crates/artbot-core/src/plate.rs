//! Plate geometry
//!
//! Physical dimensions of the ARTBot canvas plate and helpers for naming
//! wells on standard SBS labware (palette plates).

use serde::{Deserialize, Serialize};

/// Letters used for well rows (A..Z).
const ROW_LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Canvas plate geometry in millimeters.
///
/// The pixel grid of a submitted artpiece is laid over the canvas agar so
/// that pixel `(0, 0)` sits at the top-left corner and the grid center
/// coincides with the center of the reference well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateGeometry {
    /// Distance between pixel columns (mm)
    pub x_well_spacing_mm: f64,
    /// Distance between pixel rows (mm)
    pub y_well_spacing_mm: f64,
    /// Half of the printable width (mm)
    pub x_max_mm: f64,
    /// Half of the printable height (mm)
    pub y_max_mm: f64,
    /// Radius of the reference well; output coordinates are in these units (mm)
    pub well_radius_mm: f64,
}

impl PlateGeometry {
    /// Geometry of the single-well ARTBot canvas (39 x 26 pixel grid).
    pub const ARTBOT_CANVAS: PlateGeometry = PlateGeometry {
        x_well_spacing_mm: 105.0 / 38.0,
        y_well_spacing_mm: 70.0 / 25.0,
        x_max_mm: 52.5,
        y_max_mm: 35.0,
        well_radius_mm: 35.0,
    };
}

impl Default for PlateGeometry {
    fn default() -> Self {
        Self::ARTBOT_CANVAS
    }
}

/// Name a well from zero-based `(row, column)` indices, e.g. `(0, 0)` -> `"A1"`.
///
/// Returns `None` when the row index has no letter.
pub fn well_name(row: usize, column: usize) -> Option<String> {
    ROW_LETTERS
        .get(row)
        .map(|letter| format!("{}{}", *letter as char, column + 1))
}

/// Iterates well names in the order the robot enumerates them: down each
/// column first (`A1, B1, ..., H1, A2, ...`).
#[derive(Debug, Clone)]
pub struct WellOrder {
    rows: usize,
    columns: usize,
    next: usize,
}

impl WellOrder {
    /// Well order for a plate with the given layout.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows: rows.min(ROW_LETTERS.len()),
            columns,
            next: 0,
        }
    }

    /// Standard 96-well plate (8 rows x 12 columns).
    pub fn plate_96() -> Self {
        Self::new(8, 12)
    }

    /// Number of wells on the plate.
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }
}

impl Iterator for WellOrder {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rows == 0 || self.next >= self.capacity() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        well_name(index % self.rows, index / self.rows)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}
