//! Supernova rate per unit stellar mass formed.
//!
//! `rate = ∫_{threshold}^{upper} w(m) dm / ∫_{lower}^{upper} m w(m) dm`
//!
//! The numerator counts stars massive enough to explode; the denominator is
//! the total stellar mass formed by the same IMF.

use hs_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::imf::{Imf, MassDensity};
use crate::quadrature::{QuadratureConfig, QuadratureResult, integrate_with_breakpoints};

fn default_sn_threshold() -> f64 {
    8.0
}

fn default_m_lower() -> f64 {
    0.1
}

fn default_m_upper() -> f64 {
    100.0
}

/// Mass bounds (solar masses) and quadrature settings for [`snrate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnRateConfig {
    /// Lowest progenitor mass that ends as a supernova
    #[serde(default = "default_sn_threshold")]
    pub sn_threshold: f64,
    /// Lower mass bound of the IMF
    #[serde(default = "default_m_lower")]
    pub m_lower: f64,
    /// Upper mass bound of the IMF
    #[serde(default = "default_m_upper")]
    pub m_upper: f64,
    /// Quadrature controls
    #[serde(default)]
    pub quadrature: QuadratureConfig,
}

impl Default for SnRateConfig {
    fn default() -> Self {
        Self {
            sn_threshold: default_sn_threshold(),
            m_lower: default_m_lower(),
            m_upper: default_m_upper(),
            quadrature: QuadratureConfig::default(),
        }
    }
}

impl SnRateConfig {
    /// Require `0 < m_lower <= sn_threshold <= m_upper`, all finite.
    pub fn validate(&self) -> Result<()> {
        let Self { sn_threshold, m_lower, m_upper, .. } = *self;
        if !(sn_threshold.is_finite() && m_lower.is_finite() && m_upper.is_finite()) {
            return Err(Error::Validation(format!(
                "mass bounds must be finite, got lower={m_lower} threshold={sn_threshold} upper={m_upper}"
            )));
        }
        if m_lower <= 0.0 {
            return Err(Error::Validation(format!("m_lower must be > 0, got {m_lower}")));
        }
        if !(m_lower <= sn_threshold && sn_threshold <= m_upper) {
            return Err(Error::Validation(format!(
                "need m_lower <= sn_threshold <= m_upper, got {m_lower} / {sn_threshold} / {m_upper}"
            )));
        }
        Ok(())
    }
}

/// Supernova rate with both integrals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnRateBreakdown {
    /// Supernovae per solar mass formed
    pub rate: f64,
    /// `∫ w(m) dm` over the progenitor range
    pub progenitors: QuadratureResult,
    /// `∫ m w(m) dm` over the full IMF range
    pub stellar_mass: QuadratureResult,
}

/// Supernovae per unit stellar mass formed.
pub fn snrate<D: MassDensity + ?Sized>(imf: &D, config: &SnRateConfig) -> Result<f64> {
    Ok(snrate_detailed(imf, config)?.rate)
}

/// [`snrate`] for a built-in IMF name.
pub fn snrate_named(name: &str, config: &SnRateConfig) -> Result<f64> {
    snrate(&Imf::from_name(name)?, config)
}

/// [`snrate`] plus the two integrals and their error estimates.
pub fn snrate_detailed<D: MassDensity + ?Sized>(
    imf: &D,
    config: &SnRateConfig,
) -> Result<SnRateBreakdown> {
    config.validate()?;
    let breaks = imf.breakpoints();

    let progenitors = integrate_with_breakpoints(
        |m| imf.weight(m),
        config.sn_threshold,
        config.m_upper,
        breaks,
        &config.quadrature,
    )?;
    let stellar_mass = integrate_with_breakpoints(
        |m| m * imf.weight(m),
        config.m_lower,
        config.m_upper,
        breaks,
        &config.quadrature,
    )?;

    if stellar_mass.value <= 0.0 {
        return Err(Error::Validation(format!(
            "IMF mass integral over [{}, {}] must be > 0, got {}",
            config.m_lower, config.m_upper, stellar_mass.value
        )));
    }

    let rate = progenitors.value / stellar_mass.value;
    log::debug!(
        "snrate: rate={rate:.12e} progenitors={:.12e} stellar_mass={:.12e}",
        progenitors.value,
        stellar_mass.value
    );
    Ok(SnRateBreakdown { rate, progenitors, stellar_mass })
}

#[derive(Debug, Clone)]
enum ImfArg {
    Name(String),
    Resolved(Imf),
}

/// Builder-style call with every argument named.
///
/// ```
/// use hs_feedback::SnRateRequest;
///
/// let rate = SnRateRequest::new().imf_name("salpeter").sn_threshold(8.0).compute().unwrap();
/// assert!((rate - 0.007421779932978433).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnRateRequest {
    imf: Option<ImfArg>,
    config: SnRateConfig,
}

impl SnRateRequest {
    /// Request with default bounds and no IMF.
    pub fn new() -> Self {
        Self::default()
    }

    /// IMF by name; unknown names fail in [`compute`](Self::compute).
    pub fn imf_name(mut self, name: impl Into<String>) -> Self {
        self.imf = Some(ImfArg::Name(name.into()));
        self
    }

    /// IMF value (named or custom).
    pub fn imf(mut self, imf: impl Into<Imf>) -> Self {
        self.imf = Some(ImfArg::Resolved(imf.into()));
        self
    }

    /// Supernova progenitor threshold mass.
    pub fn sn_threshold(mut self, m: f64) -> Self {
        self.config.sn_threshold = m;
        self
    }

    /// Lower IMF mass bound.
    pub fn m_lower(mut self, m: f64) -> Self {
        self.config.m_lower = m;
        self
    }

    /// Upper IMF mass bound.
    pub fn m_upper(mut self, m: f64) -> Self {
        self.config.m_upper = m;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SnRateConfig) -> Self {
        self.config = config;
        self
    }

    /// Evaluate the rate.
    pub fn compute(&self) -> Result<f64> {
        Ok(self.compute_detailed()?.rate)
    }

    /// Evaluate the rate with both integrals.
    pub fn compute_detailed(&self) -> Result<SnRateBreakdown> {
        match &self.imf {
            None => Err(Error::MissingArgument("imf")),
            Some(ImfArg::Name(name)) => snrate_detailed(&Imf::from_name(name)?, &self.config),
            Some(ImfArg::Resolved(imf)) => snrate_detailed(imf, &self.config),
        }
    }
}
