//! In-memory artpiece store, used for dry runs and tests.

use crate::error::{StoreError, StoreResult};
use crate::model::NewArtpiece;
use crate::traits::{ArtpieceStore, PrintableQuery, StoreTransaction};
use artbot_core::{Artpiece, ArtpieceId, BacterialColor, SubmissionStatus};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    artpieces: Vec<Artpiece>,
    colors: Vec<BacterialColor>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_color(&mut self, color: BacterialColor) {
        self.colors.retain(|c| c.id != color.id);
        self.colors.push(color);
        self.colors.sort_by_key(|c| c.id);
    }

    pub fn insert_artpiece(&mut self, artpiece: NewArtpiece) -> ArtpieceId {
        self.next_id += 1;
        let id = ArtpieceId(self.next_id);
        self.artpieces.push(artpiece.into_artpiece(id));
        id
    }

    pub fn get(&self, id: ArtpieceId) -> Option<&Artpiece> {
        self.artpieces.iter().find(|a| a.id == id)
    }

    pub fn artpieces(&self) -> &[Artpiece] {
        &self.artpieces
    }
}

impl ArtpieceStore for MemoryStore {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn transaction(&mut self) -> StoreResult<MemoryTransaction<'_>> {
        Ok(MemoryTransaction {
            store: self,
            staged: Vec::new(),
        })
    }
}

/// Changes are staged and only applied by `commit`
pub struct MemoryTransaction<'a> {
    store: &'a mut MemoryStore,
    staged: Vec<ArtpieceId>,
}

impl MemoryTransaction<'_> {
    fn current_status(&self, id: ArtpieceId) -> StoreResult<SubmissionStatus> {
        if self.staged.contains(&id) {
            return Ok(SubmissionStatus::Processed);
        }
        self.store
            .get(id)
            .map(|a| a.status)
            .ok_or(StoreError::NotFound(id))
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn select_printable(&mut self, query: &PrintableQuery) -> StoreResult<Vec<Artpiece>> {
        let mut selected: Vec<Artpiece> = self
            .store
            .artpieces
            .iter()
            .filter(|a| a.is_printable() && !self.staged.contains(&a.id))
            .filter(|a| query.id_filter().map_or(true, |ids| ids.contains(&a.id)))
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.submit_date.cmp(&b.submit_date).then(a.id.cmp(&b.id)));
        if let Some(limit) = query.limit {
            selected.truncate(limit);
        }
        Ok(selected)
    }

    fn colors(&mut self) -> StoreResult<Vec<BacterialColor>> {
        Ok(self.store.colors.clone())
    }

    fn mark_processed(&mut self, ids: &[ArtpieceId]) -> StoreResult<()> {
        for &id in ids {
            let status = self.current_status(id)?;
            if !status.can_transition_to(SubmissionStatus::Processed) {
                return Err(StoreError::StatusConflict { id, status });
            }
            self.staged.push(id);
        }
        Ok(())
    }

    fn commit(self) -> StoreResult<()> {
        for id in self.staged {
            if let Some(artpiece) = self.store.artpieces.iter_mut().find(|a| a.id == id) {
                artpiece
                    .transition_to(SubmissionStatus::Processed)
                    .map_err(|e| StoreError::Art(e.into()))?;
            }
        }
        Ok(())
    }
}
