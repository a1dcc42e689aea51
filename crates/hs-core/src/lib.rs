//! # hs-core
//!
//! Core types, traits, and error handling for hmf2smf.
//!
//! Every other crate in the workspace depends on this one for:
//! - the shared [`Error`] taxonomy and [`Result`] alias
//! - [`Values`], the scalar-or-array field used for mass functions and efficiencies
//! - the [`Cosmology`] trait, so feedback code never depends on a concrete
//!   background model

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::Cosmology;
pub use types::Values;

/// Crate version, shared by the CLI `version` command.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
