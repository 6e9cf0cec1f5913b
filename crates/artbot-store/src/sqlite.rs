//! SQLite storage for artpieces and bacterial colors
//!
//! Schema:
//! - bacterial_colors: id, name, rgb
//! - artpieces: submission metadata, JSON art encoding and lifecycle status

use crate::error::{StoreError, StoreResult};
use crate::model::{format_timestamp, ArtpieceRow, NewArtpiece};
use crate::traits::{ArtpieceStore, PrintableQuery, StoreTransaction};
use artbot_core::{Artpiece, ArtpieceId, BacterialColor, SubmissionStatus};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS bacterial_colors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    rgb TEXT
);

CREATE TABLE IF NOT EXISTS artpieces (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    email TEXT NOT NULL DEFAULT '',
    submit_date TEXT NOT NULL,
    art_encoding TEXT NOT NULL,
    submission_status TEXT NOT NULL DEFAULT 'Submitted'
        CHECK (submission_status IN ('Submitted', 'Processing', 'Processed')),
    confirmed INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_artpieces_queue
    ON artpieces(submission_status, confirmed, submit_date);
";

/// Artpiece store backed by a SQLite database
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        debug!("Opened artpiece database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Fresh database that lives only as long as the store
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Add or replace a color
    pub fn insert_color(&self, color: &BacterialColor) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO bacterial_colors (id, name, rgb) VALUES (?1, ?2, ?3)",
            params![color.id, color.name, color.rgb],
        )?;
        Ok(())
    }

    /// Queue a new submission, returning its id
    pub fn insert_artpiece(&self, artpiece: &NewArtpiece) -> StoreResult<ArtpieceId> {
        let art = artpiece.art.to_json()?;
        self.conn.execute(
            "INSERT INTO artpieces (title, slug, email, submit_date, art_encoding, submission_status, confirmed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                artpiece.title,
                artpiece.slug,
                artpiece.email,
                format_timestamp(&artpiece.submit_date),
                art,
                SubmissionStatus::Submitted.as_str(),
                artpiece.confirmed,
            ],
        )?;
        Ok(ArtpieceId(self.conn.last_insert_rowid()))
    }

    /// Load one artpiece regardless of its status
    pub fn get(&self, id: ArtpieceId) -> StoreResult<Artpiece> {
        let sql = format!(
            "SELECT {} FROM artpieces WHERE id = ?1",
            ArtpieceRow::COLUMNS
        );
        self.conn
            .query_row(&sql, params![id.0], ArtpieceRow::from_row)
            .optional()?
            .ok_or(StoreError::NotFound(id))?
            .into_artpiece()
    }
}

impl ArtpieceStore for SqliteStore {
    type Transaction<'a> = SqliteTransaction<'a>;

    fn transaction(&mut self) -> StoreResult<SqliteTransaction<'_>> {
        // Take the write lock up front so two runs cannot select the same rows
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(SqliteTransaction { tx })
    }

    /// Plain read, so listing the queue never waits on a running print
    fn pending_jobs(&mut self) -> StoreResult<Vec<Artpiece>> {
        select_printable(&self.conn, &PrintableQuery::all())
    }
}

fn select_printable(conn: &Connection, query: &PrintableQuery) -> StoreResult<Vec<Artpiece>> {
    let mut sql = format!(
        "SELECT {} FROM artpieces WHERE submission_status = ?1 AND confirmed = 1",
        ArtpieceRow::COLUMNS
    );
    let mut values = vec![Value::Text(SubmissionStatus::Submitted.as_str().to_string())];

    if let Some(ids) = query.id_filter() {
        let placeholders = (0..ids.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" AND id IN ({})", placeholders));
        values.extend(ids.iter().map(|id| Value::Integer(id.0)));
    }
    sql.push_str(" ORDER BY submit_date ASC, id ASC");
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), ArtpieceRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(ArtpieceRow::into_artpiece).collect()
}

/// Open print-run transaction; rolls back on drop
pub struct SqliteTransaction<'a> {
    tx: rusqlite::Transaction<'a>,
}

impl StoreTransaction for SqliteTransaction<'_> {
    fn select_printable(&mut self, query: &PrintableQuery) -> StoreResult<Vec<Artpiece>> {
        select_printable(&self.tx, query)
    }

    fn colors(&mut self) -> StoreResult<Vec<BacterialColor>> {
        let mut stmt = self
            .tx
            .prepare("SELECT id, name, rgb FROM bacterial_colors ORDER BY id")?;
        let colors = stmt
            .query_map([], |row| {
                Ok(BacterialColor {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    rgb: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(colors)
    }

    fn mark_processed(&mut self, ids: &[ArtpieceId]) -> StoreResult<()> {
        for &id in ids {
            let updated = self.tx.execute(
                "UPDATE artpieces SET submission_status = ?1
                 WHERE id = ?2 AND submission_status IN (?3, ?4)",
                params![
                    SubmissionStatus::Processed.as_str(),
                    id.0,
                    SubmissionStatus::Submitted.as_str(),
                    SubmissionStatus::Processing.as_str(),
                ],
            )?;
            if updated == 0 {
                let status: Option<String> = self
                    .tx
                    .query_row(
                        "SELECT submission_status FROM artpieces WHERE id = ?1",
                        params![id.0],
                        |row| row.get(0),
                    )
                    .optional()?;
                return Err(match status {
                    None => StoreError::NotFound(id),
                    Some(status) => match status.parse() {
                        Ok(status) => StoreError::StatusConflict { id, status },
                        Err(e) => StoreError::InvalidRecord {
                            id,
                            reason: format!("{}", e),
                        },
                    },
                });
            }
        }
        debug!("Marked {} artpieces processed", ids.len());
        Ok(())
    }

    fn commit(self) -> StoreResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}
