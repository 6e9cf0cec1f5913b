//! Data models for artpieces, colors and plate positions
//!
//! This module provides:
//! - Submitted artpieces and their submission state machine
//! - The raw `color -> pixels` art encoding and its normalization
//! - Bacterial colors available on the palette
//! - Pixel-grid and plate-relative coordinates

pub mod artpiece;
pub mod color;
pub mod geometry;

pub use artpiece::{ArtEncoding, Artpiece, ArtpieceId, RawPixels, SubmissionStatus};
pub use color::{BacterialColor, ColorId};
pub use geometry::{Pixel, PlateCoordinate};
