//! Procedure assembly
//!
//! Turns a batch of artpieces into a [`ProcedurePlan`]: the labware to load,
//! where each canvas goes on the deck, and for every color the ordered
//! dispense locations on every canvas that uses it.
//!
//! Pixels are grouped by color across the whole batch rather than by
//! artpiece so the robot paints one culture onto every canvas before
//! switching tips.

use crate::error::{PlannerError, PlannerResult};
use crate::labware::LabwareSpec;
use crate::optimizer::PrintOrderOptimizer;
use crate::plate_map::CoordinateMapper;
use crate::slots::{CanvasLocationMap, CanvasSlotAllocator};
use artbot_core::{
    Artpiece, ArtpieceId, BacterialColor, ColorId, Pixel, PlateCoordinate, WellOrder,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// color -> artpiece slug -> ordered dispense locations
pub type ColorPixelMap = IndexMap<ColorId, IndexMap<String, Vec<PlateCoordinate>>>;

/// color -> display name
pub type ColorNameMap = IndexMap<ColorId, String>;

/// An artpiece included in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedArtpiece {
    pub id: ArtpieceId,
    pub title: String,
    pub slug: String,
    pub submit_date: DateTime<Utc>,
    /// Deck slot holding this artpiece's canvas
    pub slot: String,
}

/// Travel statistics for one color on one canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    pub color: ColorId,
    pub slug: String,
    pub points: usize,
    /// Open-path length in well radii
    pub travel: f64,
}

/// Everything a renderer needs to emit a procedure document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedurePlan {
    pub labware: LabwareSpec,
    pub artpieces: Vec<PlannedArtpiece>,
    pub canvas_locations: CanvasLocationMap,
    pub pixels_by_color: ColorPixelMap,
    /// Names of every known color, not only those used in the batch
    pub color_map: ColorNameMap,
    /// Palette well to fill with each color used in the batch
    pub palette_wells: IndexMap<ColorId, String>,
    pub paths: Vec<PathSummary>,
}

impl ProcedurePlan {
    /// Number of dispense locations across all colors and canvases
    pub fn pixel_count(&self) -> usize {
        self.pixels_by_color
            .values()
            .flat_map(|by_slug| by_slug.values())
            .map(Vec::len)
            .sum()
    }

    /// Instructions for filling the palette, e.g. `Sunset Orange -> A1`
    pub fn palette_instructions(&self) -> Vec<String> {
        self.palette_wells
            .iter()
            .map(|(color, well)| {
                let name = self
                    .color_map
                    .get(color)
                    .map(String::as_str)
                    .unwrap_or(color.as_str());
                format!("{} -> {}", name, well)
            })
            .collect()
    }
}

/// Builds procedure plans from artpiece batches
#[derive(Debug, Clone)]
pub struct ProcedureAssembler {
    labware: LabwareSpec,
    mapper: CoordinateMapper,
    slots: CanvasSlotAllocator,
}

impl ProcedureAssembler {
    /// Create an assembler with the default canvas geometry and slot pool
    pub fn new(labware: LabwareSpec) -> Self {
        Self {
            labware,
            mapper: CoordinateMapper::default(),
            slots: CanvasSlotAllocator::default(),
        }
    }

    /// Use a custom canvas slot pool
    pub fn with_slots(mut self, slots: CanvasSlotAllocator) -> Self {
        self.slots = slots;
        self
    }

    /// Largest batch this assembler can place on the deck
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Plan a batch. `artpieces` must already be in print order.
    pub fn assemble(
        &self,
        artpieces: &[Artpiece],
        colors: &[BacterialColor],
    ) -> PlannerResult<ProcedurePlan> {
        let slugs: Vec<&str> = artpieces.iter().map(|a| a.slug.as_str()).collect();
        let canvas_locations = self.slots.allocate(&slugs)?;

        let color_map: ColorNameMap = colors
            .iter()
            .map(|c| (c.color_id(), c.name.clone()))
            .collect();

        let mut pixels_by_color = ColorPixelMap::new();
        let mut paths = Vec::new();

        for artpiece in artpieces {
            for (color, pixels) in Self::adapt(artpiece) {
                if !color_map.contains_key(&color) {
                    return Err(PlannerError::UnknownColor {
                        slug: artpiece.slug.clone(),
                        color: color.to_string(),
                    });
                }
                if pixels.is_empty() {
                    debug!(slug = %artpiece.slug, %color, "Skipping color without pixels");
                    continue;
                }

                let ordered = PrintOrderOptimizer::order(&self.mapper.map_all(&pixels))?;
                let travel = PrintOrderOptimizer::path_length(&ordered);
                debug!(
                    slug = %artpiece.slug,
                    %color,
                    points = ordered.len(),
                    travel,
                    "Ordered pixels"
                );

                paths.push(PathSummary {
                    color: color.clone(),
                    slug: artpiece.slug.clone(),
                    points: ordered.len(),
                    travel,
                });
                pixels_by_color
                    .entry(color)
                    .or_default()
                    .insert(artpiece.slug.clone(), ordered);
            }
        }

        let palette_wells = Self::palette_layout(pixels_by_color.keys())?;

        let planned = artpieces
            .iter()
            .map(|a| PlannedArtpiece {
                id: a.id,
                title: a.title.clone(),
                slug: a.slug.clone(),
                submit_date: a.submit_date,
                slot: canvas_locations[a.slug.as_str()].clone(),
            })
            .collect();

        Ok(ProcedurePlan {
            labware: self.labware.clone(),
            artpieces: planned,
            canvas_locations,
            pixels_by_color,
            color_map,
            palette_wells,
            paths,
        })
    }

    /// Normalize an artpiece's art encoding into ordered pixel lists,
    /// expanding colors that were submitted as a bare pair.
    fn adapt(artpiece: &Artpiece) -> Vec<(ColorId, Vec<Pixel>)> {
        artpiece
            .art
            .iter()
            .map(|(color, raw)| (color.clone(), raw.to_pixels()))
            .collect()
    }

    /// Assign palette wells to colors in the order the robot enumerates wells
    fn palette_layout<'a>(
        colors: impl ExactSizeIterator<Item = &'a ColorId>,
    ) -> PlannerResult<IndexMap<ColorId, String>> {
        let mut wells = WellOrder::plate_96();
        let available = wells.capacity();
        let requested = colors.len();

        colors
            .map(|color| {
                wells
                    .next()
                    .map(|well| (color.clone(), well))
                    .ok_or(PlannerError::PaletteExhausted {
                        requested,
                        available,
                    })
            })
            .collect()
    }
}
