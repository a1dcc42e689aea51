//! Supernova-feedback-limited star-formation efficiency.
//!
//! Star formation in a halo is capped where the energy injected by its
//! supernovae matches the binding energy of the gas:
//!
//! `sfe = v_c² / (v_c² + f_gas · SN rate · E_SN)`
//!
//! `v_c` is the virial circular velocity of the halo, derived from its mass,
//! the redshift and the spherical-collapse overdensity Δ_vir(z).
//!
//! Two calling conventions are supported: [`sfe_sn_feedback`] derives `v_c`
//! from a cosmology, [`sfe_from_vc`] takes `v_c` directly.

use std::f64::consts::PI;

use hs_core::{Cosmology, Error, Result, Values};
use serde::{Deserialize, Serialize};

/// Energy released by one supernova, 10⁵¹ erg in M☉ km² s⁻².
pub const DEFAULT_SN_ENERGY: f64 = 50_300_737.0;

fn default_f_gas() -> f64 {
    1.0
}

fn default_sn_energy() -> f64 {
    DEFAULT_SN_ENERGY
}

/// Feedback coupling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackParams {
    /// Fraction of supernova energy deposited in the ambient gas
    #[serde(default = "default_f_gas")]
    pub f_gas: f64,
    /// Energy per supernova [M☉ km² s⁻²]
    #[serde(default = "default_sn_energy")]
    pub sn_energy: f64,
}

impl Default for FeedbackParams {
    fn default() -> Self {
        Self { f_gas: default_f_gas(), sn_energy: default_sn_energy() }
    }
}

impl FeedbackParams {
    /// Both parameters must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("f_gas", self.f_gas)?;
        check_non_negative("sn_energy", self.sn_energy)
    }
}

fn check_non_negative(what: &str, x: f64) -> Result<()> {
    if !x.is_finite() || x < 0.0 {
        return Err(Error::Validation(format!("{what} must be finite and >= 0, got {x}")));
    }
    Ok(())
}

fn check_redshift(z: f64) -> Result<()> {
    if !z.is_finite() || z <= -1.0 {
        return Err(Error::Validation(format!("redshift must be finite and > -1, got {z}")));
    }
    Ok(())
}

fn overdensity_from_om(om: f64) -> f64 {
    let x = om - 1.0;
    18.0 * PI * PI + 82.0 * x - 39.0 * x * x
}

/// Virial overdensity Δ_vir(z) (Bryan & Norman 1998 fit).
pub fn virial_overdensity(z: f64, cosmo: &dyn Cosmology) -> f64 {
    overdensity_from_om(cosmo.om(z))
}

/// Virial circular velocity [km/s] of a halo of mass `hmf` [M☉] at redshift `z`.
pub fn circular_velocity(hmf: f64, z: f64, cosmo: &dyn Cosmology) -> f64 {
    let om = cosmo.om(z);
    let dvir = overdensity_from_om(om);
    23.4 * (hmf / 1e8).powf(1.0 / 3.0)
        * (om * dvir / om / 18.0 / PI / PI).powf(1.0 / 6.0)
        * ((1.0 + z) / 10.0).powf(0.5)
}

/// [`circular_velocity`] for every halo mass.
pub fn circular_velocities(hmf: &Values, z: f64, cosmo: &dyn Cosmology) -> Values {
    hmf.map(|m| circular_velocity(m, z, cosmo))
}

/// `vc² / (vc² + feedback)`, taken as 1 when there is no feedback at all.
fn efficiency(vc: f64, feedback: f64) -> f64 {
    let vcsq = vc * vc;
    if feedback == 0.0 {
        return 1.0;
    }
    vcsq / (vcsq + feedback)
}

/// Star-formation efficiency for a known circular velocity `vc` [km/s].
pub fn sfe_from_vc(vc: f64, f_gas: f64, sn_rate: f64, sn_energy: f64) -> Result<f64> {
    check_non_negative("vc", vc)?;
    check_non_negative("sn_rate", sn_rate)?;
    FeedbackParams { f_gas, sn_energy }.validate()?;

    let feedback = f_gas * sn_rate * sn_energy;
    if feedback == 0.0 {
        log::warn!(
            "feedback energy is zero (f_gas={f_gas}, sn_rate={sn_rate}, sn_energy={sn_energy}); sfe = 1"
        );
    }
    Ok(efficiency(vc, feedback))
}

/// Star-formation efficiency for halos of mass `hmf` at redshift `z`.
///
/// Output has the shape of `hmf`. A cosmology whose Ω_m(z) gives a
/// non-positive Δ_vir is rejected.
pub fn sfe_sn_feedback(
    z: f64,
    hmf: &Values,
    cosmo: &dyn Cosmology,
    sn_rate: f64,
    params: &FeedbackParams,
) -> Result<Values> {
    check_redshift(z)?;
    hmf.validate_non_negative("hmf")?;
    check_non_negative("sn_rate", sn_rate)?;
    params.validate()?;

    let om = cosmo.om(z);
    if !om.is_finite() || om <= 0.0 {
        return Err(Error::Validation(format!("Om(z={z}) must be finite and > 0, got {om}")));
    }
    let dvir = overdensity_from_om(om);
    if dvir <= 0.0 {
        return Err(Error::Validation(format!(
            "virial overdensity at z={z} must be > 0, got {dvir} (Om(z)={om})"
        )));
    }

    let feedback = params.f_gas * sn_rate * params.sn_energy;
    if feedback == 0.0 {
        log::warn!(
            "feedback energy is zero (f_gas={}, sn_rate={sn_rate}, sn_energy={}); sfe = 1",
            params.f_gas,
            params.sn_energy
        );
    }

    Ok(hmf.map(|m| efficiency(circular_velocity(m, z, cosmo), feedback)))
}

/// Builder-style call where `z`, `hmf`, `cosmo` and `sn_rate` must all be set.
///
/// ```
/// use hs_core::Error;
/// use hs_feedback::SfeRequest;
///
/// let err = SfeRequest::new().compute().unwrap_err();
/// assert!(matches!(err, Error::MissingArgument("z")));
/// ```
#[derive(Clone, Default)]
pub struct SfeRequest<'a> {
    z: Option<f64>,
    hmf: Option<Values>,
    cosmo: Option<&'a dyn Cosmology>,
    sn_rate: Option<f64>,
    params: FeedbackParams,
}

impl<'a> SfeRequest<'a> {
    /// Empty request with default feedback parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Redshift.
    pub fn z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Halo masses [M☉].
    pub fn hmf(mut self, hmf: impl Into<Values>) -> Self {
        self.hmf = Some(hmf.into());
        self
    }

    /// Background cosmology.
    pub fn cosmo(mut self, cosmo: &'a dyn Cosmology) -> Self {
        self.cosmo = Some(cosmo);
        self
    }

    /// Supernovae per solar mass formed.
    pub fn sn_rate(mut self, sn_rate: f64) -> Self {
        self.sn_rate = Some(sn_rate);
        self
    }

    /// Gas coupling fraction (default 1).
    pub fn f_gas(mut self, f_gas: f64) -> Self {
        self.params.f_gas = f_gas;
        self
    }

    /// Energy per supernova (default [`DEFAULT_SN_ENERGY`]).
    pub fn sn_energy(mut self, sn_energy: f64) -> Self {
        self.params.sn_energy = sn_energy;
        self
    }

    /// Evaluate, failing with [`Error::MissingArgument`] on the first unset argument.
    pub fn compute(&self) -> Result<Values> {
        let z = self.z.ok_or(Error::MissingArgument("z"))?;
        let hmf = self.hmf.as_ref().ok_or(Error::MissingArgument("hmf"))?;
        let cosmo = self.cosmo.ok_or(Error::MissingArgument("cosmo"))?;
        let sn_rate = self.sn_rate.ok_or(Error::MissingArgument("sn_rate"))?;
        sfe_sn_feedback(z, hmf, cosmo, sn_rate, &self.params)
    }
}
