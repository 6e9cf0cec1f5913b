//! Pixel-grid and plate coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pixel of submitted art, addressed as `(row, column)` on the drawing grid.
///
/// Rows grow downward, columns grow to the right. Serialized as `[row, column]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct Pixel {
    /// Row index
    pub row: i64,
    /// Column index
    pub column: i64,
}

impl Pixel {
    /// Create a new pixel
    pub fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }
}

impl From<[i64; 2]> for Pixel {
    fn from([row, column]: [i64; 2]) -> Self {
        Self { row, column }
    }
}

impl From<Pixel> for [i64; 2] {
    fn from(pixel: Pixel) -> Self {
        [pixel.row, pixel.column]
    }
}

impl From<(i64, i64)> for Pixel {
    fn from((row, column): (i64, i64)) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A position relative to the center of the canvas reference well,
/// in units of that well's radius. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PlateCoordinate {
    /// Horizontal offset, positive to the right
    pub x: f64,
    /// Vertical offset, positive toward the top of the plate
    pub y: f64,
}

impl PlateCoordinate {
    /// Create a new plate coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate
    pub fn distance_to(&self, other: &PlateCoordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for PlateCoordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<PlateCoordinate> for [f64; 2] {
    fn from(coord: PlateCoordinate) -> Self {
        [coord.x, coord.y]
    }
}

impl fmt::Display for PlateCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}
