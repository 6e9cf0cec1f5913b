//! Error types for the planner crate.
//!
//! This module provides structured error types for print planning,
//! parameter validation, and procedure rendering.

use std::io;
use thiserror::Error;

/// Errors that can occur while planning a print batch.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The print-order optimizer needs at least one point to seed the path.
    #[error("Cannot order an empty point set")]
    EmptyPointSet,

    /// Two artpieces in one batch share a slug.
    #[error("Duplicate artpiece slug in batch: {0}")]
    DuplicateSlug(String),

    /// More canvases were requested than there are deck slots.
    #[error("Not enough canvas slots: {requested} requested, {available} available")]
    SlotPoolExhausted { requested: usize, available: usize },

    /// More colors were used than the palette plate has wells.
    #[error("Palette has {available} wells but the batch uses {requested} colors")]
    PaletteExhausted { requested: usize, available: usize },

    /// An artpiece uses a color that is not in the color table.
    #[error("Artpiece '{slug}' uses unknown color {color}")]
    UnknownColor { slug: String, color: String },

    /// Invalid parameters were provided to a planner component.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The art encoding of an artpiece could not be adapted.
    #[error("Art error: {0}")]
    Art(#[from] artbot_core::Error),

    /// Rendering the procedure document failed.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Errors related to procedure templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A substitution token does not occur exactly once.
    #[error("Template token '{token}' must appear exactly once, found {found}")]
    TokenCount { token: String, found: usize },

    /// The template file could not be read.
    #[error("Failed to read template: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
