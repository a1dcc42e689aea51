//! # hs-feedback
//!
//! Halo mass function → stellar mass function under supernova feedback.
//!
//! The pipeline has three stages, each callable on its own:
//! 1. [`snrate()`]: supernovae per solar mass formed, from an IMF
//! 2. [`sfe_sn_feedback`]: star-formation efficiency where supernova energy
//!    balances the binding energy of halo gas
//! 3. [`stellar_mass_function`]: `hmf · Ω_b0/Ω_m0 · sfe`
//!
//! [`pipeline::run`] chains them from a JSON-friendly [`PipelineSpec`].
//!
//! Everything is a pure function of its inputs; nothing is cached.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Feedback-limited star-formation efficiency and virial velocity.
pub mod feedback;
/// Initial mass functions.
pub mod imf;
/// End-to-end pipeline.
pub mod pipeline;
/// Adaptive Gauss-Kronrod quadrature.
pub mod quadrature;
/// Stellar mass function.
pub mod smf;
/// Supernova rate integrator.
pub mod snrate;

pub use feedback::{
    DEFAULT_SN_ENERGY, FeedbackParams, SfeRequest, circular_velocities, circular_velocity,
    sfe_from_vc, sfe_sn_feedback, virial_overdensity,
};
pub use imf::{CustomImf, Imf, MassDensity, NamedImf};
pub use pipeline::{PipelineOutput, PipelineSpec};
pub use quadrature::{QuadratureConfig, QuadratureResult};
pub use smf::stellar_mass_function;
pub use snrate::{SnRateBreakdown, SnRateConfig, SnRateRequest, snrate, snrate_detailed, snrate_named};
