use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a bacterial color as used in art encodings.
///
/// Colors are stored with integer ids but art encodings key them by the
/// id's decimal string, so the string form is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorId(String);

impl ColorId {
    /// Create a color id from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as it appears in art encodings
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for ColorId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ColorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bacterial culture available for painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacterialColor {
    /// Database id
    pub id: i64,
    /// Display name, e.g. "Sunset Orange"
    pub name: String,
    /// Preview color for the drawing UI, as `#rrggbb`
    #[serde(default)]
    pub rgb: Option<String>,
}

impl BacterialColor {
    /// Create a new color without a preview value
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rgb: None,
        }
    }

    /// The id used to key this color in art encodings
    pub fn color_id(&self) -> ColorId {
        ColorId::from(self.id)
    }
}
