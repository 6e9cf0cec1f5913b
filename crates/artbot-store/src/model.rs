//! Records exchanged with the database.

use crate::error::{StoreError, StoreResult};
use artbot_core::{ArtEncoding, Artpiece, ArtpieceId, SubmissionStatus};
use chrono::{DateTime, SecondsFormat, Utc};

/// A submission to add to the queue
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtpiece {
    pub title: String,
    pub slug: String,
    pub email: String,
    pub submit_date: DateTime<Utc>,
    pub confirmed: bool,
    pub art: ArtEncoding,
}

impl NewArtpiece {
    /// Confirmed submission with an empty email
    pub fn confirmed(
        title: impl Into<String>,
        slug: impl Into<String>,
        submit_date: DateTime<Utc>,
        art: ArtEncoding,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            email: String::new(),
            submit_date,
            confirmed: true,
            art,
        }
    }

    /// The artpiece this submission becomes once it has an id
    pub fn into_artpiece(self, id: ArtpieceId) -> Artpiece {
        Artpiece {
            id,
            title: self.title,
            slug: self.slug,
            submit_date: self.submit_date,
            status: SubmissionStatus::Submitted,
            confirmed: self.confirmed,
            art: self.art,
        }
    }
}

/// Column values of one `artpieces` row, before validation
#[derive(Debug, Clone)]
pub(crate) struct ArtpieceRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub submit_date: String,
    pub status: String,
    pub confirmed: bool,
    pub art_encoding: String,
}

impl ArtpieceRow {
    pub const COLUMNS: &'static str =
        "id, title, slug, submit_date, submission_status, confirmed, art_encoding";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            slug: row.get(2)?,
            submit_date: row.get(3)?,
            status: row.get(4)?,
            confirmed: row.get(5)?,
            art_encoding: row.get(6)?,
        })
    }

    pub fn into_artpiece(self) -> StoreResult<Artpiece> {
        let id = ArtpieceId(self.id);
        let submit_date = parse_timestamp(&self.submit_date).map_err(|reason| {
            StoreError::InvalidRecord {
                id,
                reason: format!("submit_date {:?}: {}", self.submit_date, reason),
            }
        })?;
        let status = self
            .status
            .parse::<SubmissionStatus>()
            .map_err(|e| StoreError::InvalidRecord {
                id,
                reason: e.to_string(),
            })?;
        let art = ArtEncoding::from_json(&self.art_encoding)
            .map_err(|source| StoreError::InvalidArt { id, source })?;

        Ok(Artpiece {
            id,
            title: self.title,
            slug: self.slug,
            submit_date,
            status,
            confirmed: self.confirmed,
            art,
        })
    }
}

/// Timestamps are stored as RFC 3339 text with microseconds so that text
/// order matches time order.
pub(crate) fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|t| t.with_timezone(&Utc))
}
