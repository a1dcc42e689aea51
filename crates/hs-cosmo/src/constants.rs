//! CGS constants for the photon density.
//!
//! The Ω_γ prefactor is rebuilt from these rather than hard-coded so it stays
//! consistent with the critical density used elsewhere.

/// Stefan-Boltzmann constant [erg cm⁻² s⁻¹ K⁻⁴].
pub const SIGMA_SB: f64 = 5.670_374_419e-5;

/// Speed of light [cm s⁻¹].
pub const SPEED_OF_LIGHT_CM: f64 = 2.997_924_58e10;

/// Present-day critical density [M☉ kpc⁻³ h²].
pub const RHO_CRIT_0_KPC3: f64 = 2.775_366_27e2;

/// Solar mass [g].
pub const MSUN_G: f64 = 1.988_47e33;

/// Kiloparsec [cm].
pub const KPC_CM: f64 = 3.085_677_581e21;

/// Neutrino-to-photon energy density ratio per effective species, 7/8 (4/11)^(4/3).
pub fn neutrino_photon_ratio() -> f64 {
    7.0 / 8.0 * (4.0_f64 / 11.0).powf(4.0 / 3.0)
}

/// Ω_γ0 h² / T_CMB⁴, i.e. `4 σ_SB / c³ / ρ_crit0` in cgs.
pub fn photon_density_prefactor() -> f64 {
    let rho_crit_cgs = RHO_CRIT_0_KPC3 * MSUN_G / KPC_CM.powi(3);
    4.0 * SIGMA_SB / SPEED_OF_LIGHT_CM.powi(3) / rho_crit_cgs
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_photon_prefactor_close_to_textbook() {
        // Commonly quoted as 4.48131e-7 K⁻⁴.
        assert_relative_eq!(photon_density_prefactor(), 4.48131e-7, max_relative = 1e-4);
    }

    #[test]
    fn test_neutrino_ratio() {
        assert_relative_eq!(neutrino_photon_ratio(), 0.227_107_317_66, max_relative = 1e-9);
    }
}
