use crate::error::StoreResult;
use artbot_core::{Artpiece, ArtpieceId, BacterialColor};

/// Which printable artpieces to load.
///
/// Printable means submitted and confirmed. Results are ordered oldest
/// submission first, ties broken by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintableQuery {
    /// Restrict to these ids; `None` or an empty list means no restriction
    pub ids: Option<Vec<ArtpieceId>>,
    /// Maximum number of artpieces
    pub limit: Option<usize>,
}

impl PrintableQuery {
    /// The whole print queue
    pub fn all() -> Self {
        Self::default()
    }

    /// At most `limit` artpieces
    pub fn limit(limit: usize) -> Self {
        Self {
            ids: None,
            limit: Some(limit),
        }
    }

    /// Restrict the query to specific artpieces
    pub fn with_ids(mut self, ids: Vec<ArtpieceId>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Ids filter, if it restricts anything
    pub fn id_filter(&self) -> Option<&[ArtpieceId]> {
        self.ids.as_deref().filter(|ids| !ids.is_empty())
    }
}

/// A source of artpieces and colors that supports transactional print runs
pub trait ArtpieceStore {
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    /// Start a transaction. Dropping it without [`StoreTransaction::commit`]
    /// discards every change made through it.
    fn transaction(&mut self) -> StoreResult<Self::Transaction<'_>>;

    /// The whole print queue, oldest first
    fn pending_jobs(&mut self) -> StoreResult<Vec<Artpiece>> {
        let mut tx = self.transaction()?;
        let jobs = tx.select_printable(&PrintableQuery::all())?;
        Ok(jobs)
    }
}

/// Operations available inside a print-run transaction
pub trait StoreTransaction {
    /// Load printable artpieces
    fn select_printable(&mut self, query: &PrintableQuery) -> StoreResult<Vec<Artpiece>>;

    /// Every known bacterial color
    fn colors(&mut self) -> StoreResult<Vec<BacterialColor>>;

    /// Advance artpieces to `Processed`
    fn mark_processed(&mut self, ids: &[ArtpieceId]) -> StoreResult<()>;

    /// Make the changes permanent
    fn commit(self) -> StoreResult<()>;
}
