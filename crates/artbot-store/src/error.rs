//! Error types for the store crate.
//!
//! This module provides structured error types for reading the print queue
//! and recording status changes.

use artbot_core::{ArtpieceId, SubmissionStatus};
use std::io;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested artpiece was not found.
    #[error("Artpiece not found: {0}")]
    NotFound(ArtpieceId),

    /// A stored artpiece has an art encoding that cannot be read.
    #[error("Artpiece {id} has invalid art: {source}")]
    InvalidArt {
        id: ArtpieceId,
        #[source]
        source: artbot_core::Error,
    },

    /// A stored row could not be converted into a domain value.
    #[error("Artpiece {id} has an invalid record: {reason}")]
    InvalidRecord { id: ArtpieceId, reason: String },

    /// The artpiece is not in a state that allows the requested change.
    #[error("Artpiece {id} cannot be marked processed from status {status}")]
    StatusConflict {
        id: ArtpieceId,
        status: SubmissionStatus,
    },

    /// Domain value could not be encoded.
    #[error(transparent)]
    Art(#[from] artbot_core::Error),

    /// The database reported an error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error while preparing the database location.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
