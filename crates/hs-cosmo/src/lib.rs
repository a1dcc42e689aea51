//! # hs-cosmo
//!
//! Background cosmology for hmf2smf.
//!
//! Provides [`FlatLambdaCdm`], a flat ΛCDM model with optional relativistic
//! species, a set of named parameter presets, and [`FixedDensities`] for
//! callers that only know Ω_b and Ω_m. Both implement
//! [`hs_core::Cosmology`].

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Physical constants used to derive the radiation density.
pub mod constants;
/// Flat ΛCDM model and constant-density provider.
pub mod lambda_cdm;
/// Named parameter sets and the name-or-params spec.
pub mod presets;

pub use lambda_cdm::{CosmologyParams, FixedDensities, FlatLambdaCdm};
pub use presets::{CosmologySpec, PRESET_NAMES, from_name};
