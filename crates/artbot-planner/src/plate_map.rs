//! Pixel grid to plate coordinate mapping.

use artbot_core::{Pixel, PlateCoordinate, PlateGeometry};

/// Converts drawing-grid pixels into positions relative to the canvas
/// reference well, in units of well radius.
///
/// Rows are inverted because image rows grow downward while plate `y`
/// grows upward from the center.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapper {
    geometry: PlateGeometry,
}

impl CoordinateMapper {
    /// Create a mapper for the given plate geometry
    pub fn new(geometry: PlateGeometry) -> Self {
        Self { geometry }
    }

    /// Map a single pixel
    pub fn map(&self, pixel: Pixel) -> PlateCoordinate {
        let g = &self.geometry;
        let x = (g.x_well_spacing_mm * pixel.column as f64 - g.x_max_mm) / g.well_radius_mm;
        let y = (g.y_well_spacing_mm * -(pixel.row as f64) + g.y_max_mm) / g.well_radius_mm;
        PlateCoordinate::new(x, y)
    }

    /// Map pixels, keeping their order
    pub fn map_all(&self, pixels: &[Pixel]) -> Vec<PlateCoordinate> {
        pixels.iter().map(|p| self.map(*p)).collect()
    }
}
