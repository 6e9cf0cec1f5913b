//! Submitted artpieces
//!
//! An artpiece is stored as a mapping from color id to the pixels painted
//! in that color. The submission side encodes a color with exactly one pixel
//! as a bare `[row, column]` pair rather than a one-element list; this
//! module accepts both shapes and exposes them through [`RawPixels`].

use super::color::ColorId;
use super::geometry::Pixel;
use crate::error::{ArtError, StatusError};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Database id of an artpiece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtpieceId(pub i64);

impl fmt::Display for ArtpieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Submission lifecycle of an artpiece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Waiting in the print queue
    Submitted,
    /// Claimed by a print run that has not finished yet
    Processing,
    /// Included in a generated procedure
    Processed,
}

impl SubmissionStatus {
    /// Name used in storage and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Processing => "Processing",
            Self::Processed => "Processed",
        }
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// The state machine only moves forward; `Processed` is terminal.
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::Processing)
                | (Self::Submitted, Self::Processed)
                | (Self::Processing, Self::Processed)
        )
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "processing" => Ok(Self::Processing),
            "processed" => Ok(Self::Processed),
            _ => Err(StatusError::Unknown {
                value: s.to_string(),
            }),
        }
    }
}

/// Pixels of one color as they arrive from the submission side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawPixels {
    /// The regular shape: a list of `[row, column]` pairs
    Many(Vec<Pixel>),
    /// A lone pixel encoded as a bare pair
    Single(Pixel),
}

impl RawPixels {
    /// Normalize into an ordered pixel list
    pub fn into_pixels(self) -> Vec<Pixel> {
        match self {
            Self::Many(pixels) => pixels,
            Self::Single(pixel) => vec![pixel],
        }
    }

    /// Normalized copy of the pixel list
    pub fn to_pixels(&self) -> Vec<Pixel> {
        self.clone().into_pixels()
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        match self {
            Self::Many(pixels) => pixels.len(),
            Self::Single(_) => 1,
        }
    }

    /// True if the color has no pixels
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn from_value(color: &str, value: &Value) -> Result<Self, ArtError> {
        let malformed = |reason: String| ArtError::MalformedPixel {
            color: color.to_string(),
            reason,
        };

        let items = value
            .as_array()
            .ok_or_else(|| malformed(format!("expected a list, got {}", value)))?;

        if items.len() == 2 && items.iter().all(Value::is_number) {
            return pixel_from_values(items).map(Self::Single).map_err(malformed);
        }

        items
            .iter()
            .map(|item| match item.as_array() {
                Some(pair) => pixel_from_values(pair),
                None => Err(format!("expected a [row, column] pair, got {}", item)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Many)
            .map_err(malformed)
    }
}

fn pixel_from_values(pair: &[Value]) -> Result<Pixel, String> {
    if pair.len() != 2 {
        return Err(format!("expected 2 components, got {}", pair.len()));
    }
    let component = |v: &Value| {
        v.as_i64()
            .ok_or_else(|| format!("pixel component {} is not an integer", v))
    };
    Ok(Pixel::new(component(&pair[0])?, component(&pair[1])?))
}

/// The `color -> pixels` encoding of an artpiece, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ArtEncoding(IndexMap<ColorId, RawPixels>);

impl ArtEncoding {
    /// Create an empty encoding
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON art encoding
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::try_from(value)?)
    }

    /// Serialize back to JSON, preserving color order and pixel shapes
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Add (or replace) a color's pixel list
    pub fn insert(&mut self, color: impl Into<ColorId>, pixels: Vec<Pixel>) {
        self.0.insert(color.into(), RawPixels::Many(pixels));
    }

    /// Add a color painted with a single pixel, using the compact encoding
    pub fn insert_single(&mut self, color: impl Into<ColorId>, pixel: Pixel) {
        self.0.insert(color.into(), RawPixels::Single(pixel));
    }

    /// Colors in submission order
    pub fn iter(&self) -> impl Iterator<Item = (&ColorId, &RawPixels)> {
        self.0.iter()
    }

    /// Number of colors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no colors are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of pixels across all colors
    pub fn pixel_count(&self) -> usize {
        self.0.values().map(RawPixels::len).sum()
    }
}

impl TryFrom<Value> for ArtEncoding {
    type Error = ArtError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(colors) = value else {
            return Err(ArtError::NotAColorMap {
                reason: format!("expected an object, got {}", value),
            });
        };

        colors
            .iter()
            .map(|(color, pixels)| {
                RawPixels::from_value(color, pixels).map(|raw| (ColorId::new(color.clone()), raw))
            })
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(Self)
    }
}

/// A user-submitted piece of pixel art
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artpiece {
    /// Database id
    pub id: ArtpieceId,
    /// Title given by the artist
    pub title: String,
    /// Short identifier, unique within a print batch
    pub slug: String,
    /// Submission time
    pub submit_date: DateTime<Utc>,
    /// Lifecycle state
    pub status: SubmissionStatus,
    /// Whether the artist confirmed the submission by email
    pub confirmed: bool,
    /// Pixels grouped by color
    pub art: ArtEncoding,
}

impl Artpiece {
    /// True if the artpiece is waiting to be printed
    pub fn is_printable(&self) -> bool {
        self.status == SubmissionStatus::Submitted && self.confirmed
    }

    /// Move to `next`, rejecting backward or repeated transitions
    pub fn transition_to(&mut self, next: SubmissionStatus) -> Result<(), StatusError> {
        if !self.status.can_transition_to(next) {
            return Err(StatusError::InvalidTransition {
                current: self.status.to_string(),
                requested: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}
