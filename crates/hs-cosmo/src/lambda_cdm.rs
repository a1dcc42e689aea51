//! Flat ΛCDM background.

use hs_core::{Cosmology, Error, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{neutrino_photon_ratio, photon_density_prefactor};

fn default_tcmb0() -> f64 {
    2.7255
}

fn default_neff() -> f64 {
    3.046
}

fn default_relspecies() -> bool {
    true
}

/// Parameters of a flat ΛCDM cosmology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmologyParams {
    /// Hubble constant [km s⁻¹ Mpc⁻¹]
    #[serde(rename = "H0")]
    pub h0: f64,
    /// Present-day matter density parameter
    #[serde(rename = "Om0")]
    pub om0: f64,
    /// Present-day baryon density parameter
    #[serde(rename = "Ob0")]
    pub ob0: f64,
    /// CMB temperature today [K]
    #[serde(rename = "Tcmb0", default = "default_tcmb0")]
    pub tcmb0: f64,
    /// Effective number of neutrino species
    #[serde(rename = "Neff", default = "default_neff")]
    pub neff: f64,
    /// Include photons and massless neutrinos in E(z)
    #[serde(default = "default_relspecies")]
    pub relspecies: bool,
}

impl CosmologyParams {
    /// Parameters with default CMB temperature, N_eff and relativistic species.
    pub fn new(h0: f64, om0: f64, ob0: f64) -> Self {
        Self {
            h0,
            om0,
            ob0,
            tcmb0: default_tcmb0(),
            neff: default_neff(),
            relspecies: default_relspecies(),
        }
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.h0, self.om0, self.ob0, self.tcmb0, self.neff];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(Error::Validation(format!("cosmology parameters must be finite: {self:?}")));
        }
        if self.h0 <= 0.0 {
            return Err(Error::Validation(format!("H0 must be > 0, got {}", self.h0)));
        }
        if self.om0 <= 0.0 || self.om0 > 1.0 {
            return Err(Error::Validation(format!("Om0 must be in (0, 1], got {}", self.om0)));
        }
        if self.ob0 < 0.0 || self.ob0 > self.om0 {
            return Err(Error::Validation(format!(
                "Ob0 must be in [0, Om0={}], got {}",
                self.om0, self.ob0
            )));
        }
        if self.tcmb0 < 0.0 || self.neff < 0.0 {
            return Err(Error::Validation(format!(
                "Tcmb0 and Neff must be >= 0, got {} and {}",
                self.tcmb0, self.neff
            )));
        }
        Ok(())
    }
}

/// Flat ΛCDM cosmology with optional relativistic species.
///
/// Dark energy absorbs whatever is left after matter and radiation:
/// `Ω_Λ = 1 - Ω_m0 - Ω_r0`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatLambdaCdm {
    params: CosmologyParams,
    ogamma0: f64,
    onu0: f64,
    ode0: f64,
}

impl FlatLambdaCdm {
    /// Build a cosmology from validated parameters.
    pub fn new(params: CosmologyParams) -> Result<Self> {
        params.validate()?;

        let h = params.h0 / 100.0;
        let (ogamma0, onu0) = if params.relspecies {
            let ogamma0 = photon_density_prefactor() * params.tcmb0.powi(4) / (h * h);
            (ogamma0, ogamma0 * neutrino_photon_ratio() * params.neff)
        } else {
            (0.0, 0.0)
        };

        let ode0 = 1.0 - params.om0 - ogamma0 - onu0;
        if ode0 < 0.0 {
            return Err(Error::Validation(format!(
                "matter and radiation exceed closure density (Ode0 = {ode0})"
            )));
        }

        log::debug!(
            "FlatLambdaCdm: H0={} Om0={} Ob0={} Or0={:.6e} Ode0={:.6}",
            params.h0,
            params.om0,
            params.ob0,
            ogamma0 + onu0,
            ode0
        );

        Ok(Self { params, ogamma0, onu0, ode0 })
    }

    /// Input parameters.
    pub fn params(&self) -> &CosmologyParams {
        &self.params
    }

    /// Dimensionless Hubble parameter h = H0 / 100.
    pub fn h(&self) -> f64 {
        self.params.h0 / 100.0
    }

    /// Photon density today.
    pub fn ogamma0(&self) -> f64 {
        self.ogamma0
    }

    /// Massless-neutrino density today.
    pub fn onu0(&self) -> f64 {
        self.onu0
    }

    /// Total relativistic density today.
    pub fn or0(&self) -> f64 {
        self.ogamma0 + self.onu0
    }

    /// Dark-energy density today.
    pub fn ode0(&self) -> f64 {
        self.ode0
    }

    /// E(z) = H(z) / H0.
    pub fn ez(&self, z: f64) -> f64 {
        self.ez2(z).sqrt()
    }

    /// H(z) [km s⁻¹ Mpc⁻¹].
    pub fn hz(&self, z: f64) -> f64 {
        self.params.h0 * self.ez(z)
    }

    /// Dark-energy density parameter at `z`.
    pub fn ode(&self, z: f64) -> f64 {
        self.ode0 / self.ez2(z)
    }

    /// Relativistic density parameter at `z`.
    pub fn or(&self, z: f64) -> f64 {
        self.or0() * (1.0 + z).powi(4) / self.ez2(z)
    }

    /// Baryon density parameter at `z`.
    pub fn ob(&self, z: f64) -> f64 {
        self.params.ob0 * (1.0 + z).powi(3) / self.ez2(z)
    }

    fn ez2(&self, z: f64) -> f64 {
        let zp1 = 1.0 + z;
        self.params.om0 * zp1.powi(3) + self.or0() * zp1.powi(4) + self.ode0
    }
}

impl Cosmology for FlatLambdaCdm {
    fn om(&self, z: f64) -> f64 {
        self.params.om0 * (1.0 + z).powi(3) / self.ez2(z)
    }

    fn ob0(&self) -> f64 {
        self.params.ob0
    }

    fn om0(&self) -> f64 {
        self.params.om0
    }
}

/// Constant densities: Ω_m(z) = Ω_m0 at every redshift.
///
/// For callers that supply Ω_b and Ω_m directly instead of a background model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedDensities {
    /// Baryon density parameter
    #[serde(rename = "Ob")]
    pub ob: f64,
    /// Matter density parameter
    #[serde(rename = "Om")]
    pub om: f64,
}

impl FixedDensities {
    /// Validated constant-density provider.
    pub fn new(ob: f64, om: f64) -> Result<Self> {
        if !ob.is_finite() || !om.is_finite() || om <= 0.0 || om > 1.0 || ob < 0.0 || ob > om {
            return Err(Error::Validation(format!(
                "need 0 <= Ob <= Om and 0 < Om <= 1, got Ob={ob} Om={om}"
            )));
        }
        Ok(Self { ob, om })
    }
}

impl Cosmology for FixedDensities {
    fn om(&self, _z: f64) -> f64 {
        self.om
    }

    fn ob0(&self) -> f64 {
        self.ob
    }

    fn om0(&self) -> f64 {
        self.om
    }
}
