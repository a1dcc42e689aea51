//! Named cosmology presets.
//!
//! Parameter sets are looked up by case-insensitive name; [`CosmologySpec`]
//! lets configuration files give either a name or explicit parameters.

use hs_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::lambda_cdm::{CosmologyParams, FlatLambdaCdm};

/// Names accepted by [`from_name`].
pub const PRESET_NAMES: [&str; 5] = ["planck18", "planck15", "planck13", "wmap9", "wmap7"];

/// Parameters for a named preset (case-insensitive).
pub fn preset_params(name: &str) -> Result<CosmologyParams> {
    let (h0, om0, ob0) = match name.to_ascii_lowercase().as_str() {
        "planck18" => (67.66, 0.3111, 0.0490),
        "planck15" => (67.74, 0.3089, 0.0486),
        "planck13" => (67.77, 0.3071, 0.0483),
        "wmap9" => (69.32, 0.2865, 0.04628),
        "wmap7" => (70.2, 0.2743, 0.0458),
        _ => return Err(Error::UnknownCosmology(name.to_string())),
    };
    Ok(CosmologyParams::new(h0, om0, ob0))
}

/// Build a preset cosmology by name (case-insensitive).
pub fn from_name(name: &str) -> Result<FlatLambdaCdm> {
    FlatLambdaCdm::new(preset_params(name)?)
}

/// A cosmology given either as a preset name or as explicit parameters.
///
/// JSON: `"planck18"` or `{"H0": 70, "Om0": 0.3, "Ob0": 0.05}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CosmologySpec {
    /// Preset name
    Named(String),
    /// Explicit parameters
    Params(CosmologyParams),
}

impl Default for CosmologySpec {
    fn default() -> Self {
        Self::Named("planck18".to_string())
    }
}

impl CosmologySpec {
    /// Build the cosmology this spec describes.
    pub fn build(&self) -> Result<FlatLambdaCdm> {
        match self {
            Self::Named(name) => from_name(name),
            Self::Params(params) => FlatLambdaCdm::new(params.clone()),
        }
    }
}
