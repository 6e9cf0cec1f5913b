//! Canvas slot allocation
//!
//! Each artpiece in a batch is printed on its own canvas plate, and each
//! canvas occupies one deck slot. Slots are handed out in batch order from
//! a fixed pool.

use crate::error::{PlannerError, PlannerResult};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Mapping from artpiece slug to deck slot, in batch order
pub type CanvasLocationMap = IndexMap<String, String>;

/// Deck slots that are normally free for canvases
pub const DEFAULT_CANVAS_SLOTS: [&str; 9] = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Assigns deck slots to canvases
#[derive(Debug, Clone)]
pub struct CanvasSlotAllocator {
    pool: Vec<String>,
}

impl Default for CanvasSlotAllocator {
    fn default() -> Self {
        Self {
            pool: DEFAULT_CANVAS_SLOTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CanvasSlotAllocator {
    /// Create an allocator over a custom slot pool.
    ///
    /// The pool must be non-empty and free of duplicates.
    pub fn new(pool: Vec<String>) -> PlannerResult<Self> {
        if pool.is_empty() {
            return Err(PlannerError::InvalidParameters(
                "canvas slot pool is empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = pool.iter().find(|slot| !seen.insert(slot.as_str())) {
            return Err(PlannerError::InvalidParameters(format!(
                "canvas slot '{}' listed twice",
                dup
            )));
        }
        Ok(Self { pool })
    }

    /// Number of canvases that fit on the deck
    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    /// Assign one slot per slug, in slug order.
    ///
    /// Slugs must be unique: a repeated slug would otherwise collapse two
    /// canvases into one map entry.
    pub fn allocate<S: AsRef<str>>(&self, slugs: &[S]) -> PlannerResult<CanvasLocationMap> {
        if slugs.len() > self.pool.len() {
            return Err(PlannerError::SlotPoolExhausted {
                requested: slugs.len(),
                available: self.pool.len(),
            });
        }

        let mut locations = CanvasLocationMap::with_capacity(slugs.len());
        for (slug, slot) in slugs.iter().zip(&self.pool) {
            let slug = slug.as_ref();
            if locations.insert(slug.to_string(), slot.clone()).is_some() {
                return Err(PlannerError::DuplicateSlug(slug.to_string()));
            }
        }
        Ok(locations)
    }
}
