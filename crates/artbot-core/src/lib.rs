//! # ARTBot Core
//!
//! Core types and utilities shared by the ARTBot crates.
//! Provides the artpiece data model, plate geometry, and the
//! unified error type used across the workspace.

pub mod data;
pub mod error;
pub mod plate;

pub use data::{
    ArtEncoding, Artpiece, ArtpieceId, BacterialColor, ColorId, Pixel, PlateCoordinate,
    RawPixels, SubmissionStatus,
};

pub use error::{ArtError, Error, Result, StatusError};

pub use plate::{well_name, PlateGeometry, WellOrder};
