//! Labware selection for the Opentrons deck

use crate::error::{PlannerError, PlannerResult};
use serde::{Deserialize, Serialize};

/// Pipettes whose name contains this marker need the large tip rack
pub const HIGH_VOLUME_MARKER: &str = "p300";
/// Tip rack for high-volume pipettes
pub const HIGH_VOLUME_TIPRACK: &str = "opentrons_96_tiprack_200ul";
/// Tip rack for everything else
pub const LOW_VOLUME_TIPRACK: &str = "opentrons_96_tiprack_10ul";

/// Default palette plate
pub const DEFAULT_PALETTE: &str = "corning_96_wellplate_360ul_flat";
/// Default pipette
pub const DEFAULT_PIPETTE: &str = "p10_single";

/// Labware requested by the operator, using Opentrons standard names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabwareSelection {
    /// Plate holding one well per color culture
    pub palette: String,
    /// Pipette model
    pub pipette: String,
}

impl Default for LabwareSelection {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_string(),
            pipette: DEFAULT_PIPETTE.to_string(),
        }
    }
}

/// Complete labware set written into a procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabwareSpec {
    pub palette: String,
    pub pipette: String,
    pub tiprack: String,
}

impl LabwareSpec {
    /// Complete a selection with the matching tip rack
    pub fn resolve(selection: &LabwareSelection) -> PlannerResult<Self> {
        let palette = selection.palette.trim();
        let pipette = selection.pipette.trim();
        if palette.is_empty() || pipette.is_empty() {
            return Err(PlannerError::InvalidParameters(
                "palette and pipette names must not be empty".to_string(),
            ));
        }
        for name in [palette, pipette] {
            if !is_labware_name(name) {
                return Err(PlannerError::InvalidParameters(format!(
                    "invalid labware name {:?}: only letters, digits, '_', '.' and '-' are allowed",
                    name
                )));
            }
        }

        Ok(Self {
            palette: palette.to_string(),
            pipette: pipette.to_string(),
            tiprack: tiprack_for(pipette).to_string(),
        })
    }
}

/// Opentrons load names are plain identifiers and get quoted verbatim into
/// the protocol
fn is_labware_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Tip rack that fits `pipette`
pub fn tiprack_for(pipette: &str) -> &'static str {
    if pipette.to_lowercase().contains(HIGH_VOLUME_MARKER) {
        HIGH_VOLUME_TIPRACK
    } else {
        LOW_VOLUME_TIPRACK
    }
}
