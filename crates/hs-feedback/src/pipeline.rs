//! IMF → supernova rate → SFE → stellar mass function in one call.
//!
//! [`PipelineSpec`] is the JSON form consumed by the CLI `run` command:
//!
//! ```json
//! {
//!   "imf": "kroupa",
//!   "redshift": 7.0,
//!   "cosmology": "planck18",
//!   "halo_mass": [1e7, 1e11, 1e15],
//!   "hmf": [0.3, 0.02, 1e-6],
//!   "snrate": { "sn_threshold": 8.0 },
//!   "feedback": { "f_gas": 1.0 }
//! }
//! ```
//!
//! `cosmology`, `snrate` and `feedback` are optional. `hmf` defaults to
//! `halo_mass`.

use hs_core::{Cosmology, Error, Result, Values};
use hs_cosmo::CosmologySpec;
use serde::{Deserialize, Serialize};

use crate::feedback::{FeedbackParams, circular_velocities, sfe_sn_feedback, virial_overdensity};
use crate::imf::Imf;
use crate::smf::stellar_mass_function;
use crate::snrate::{SnRateConfig, snrate};

/// End-to-end run description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Built-in IMF name
    #[serde(default)]
    pub imf: Option<String>,
    /// Redshift
    #[serde(default)]
    pub redshift: Option<f64>,
    /// Background cosmology (default planck18)
    #[serde(default)]
    pub cosmology: CosmologySpec,
    /// Halo masses [M☉] used for the circular velocity
    #[serde(default)]
    pub halo_mass: Option<Values>,
    /// Halo mass function values; defaults to `halo_mass`
    #[serde(default)]
    pub hmf: Option<Values>,
    /// Supernova rate integration bounds
    #[serde(default)]
    pub snrate: SnRateConfig,
    /// Feedback coupling
    #[serde(default)]
    pub feedback: FeedbackParams,
}

impl PipelineSpec {
    /// Parse a spec from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Every intermediate and final quantity of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// IMF name or custom label
    pub imf: String,
    /// Redshift
    pub redshift: f64,
    /// Supernovae per solar mass formed
    pub sn_rate: f64,
    /// Ω_b0 / Ω_m0
    pub baryon_fraction: f64,
    /// Ω_m(z)
    pub om_z: f64,
    /// Δ_vir(z)
    pub virial_overdensity: f64,
    /// Circular velocity per halo mass [km/s]
    pub circular_velocity: Values,
    /// Star-formation efficiency per halo mass
    pub sfe: Values,
    /// Stellar mass function
    pub smf: Values,
}

/// Run the pipeline described by `spec`.
pub fn run(spec: &PipelineSpec) -> Result<PipelineOutput> {
    let imf = Imf::from_name(spec.imf.as_deref().ok_or(Error::MissingArgument("imf"))?)?;
    let z = spec.redshift.ok_or(Error::MissingArgument("redshift"))?;
    let halo_mass = spec.halo_mass.as_ref().ok_or(Error::MissingArgument("halo_mass"))?;
    let hmf = spec.hmf.as_ref().unwrap_or(halo_mass);
    let cosmo = spec.cosmology.build()?;

    run_with(&imf, z, halo_mass, hmf, &cosmo, &spec.snrate, &spec.feedback)
}

/// Run the pipeline with an already-built IMF and cosmology.
pub fn run_with(
    imf: &Imf,
    z: f64,
    halo_mass: &Values,
    hmf: &Values,
    cosmo: &dyn Cosmology,
    snrate_config: &SnRateConfig,
    feedback: &FeedbackParams,
) -> Result<PipelineOutput> {
    let sn_rate = snrate(imf, snrate_config)?;
    let sfe = sfe_sn_feedback(z, halo_mass, cosmo, sn_rate, feedback)?;
    let smf = stellar_mass_function(hmf, &sfe, cosmo)?;

    log::debug!("pipeline: imf={imf} z={z} sn_rate={sn_rate:.6e} bins={}", smf.len());

    Ok(PipelineOutput {
        imf: imf.name().to_string(),
        redshift: z,
        sn_rate,
        baryon_fraction: cosmo.baryon_fraction(),
        om_z: cosmo.om(z),
        virial_overdensity: virial_overdensity(z, cosmo),
        circular_velocity: circular_velocities(halo_mass, z, cosmo),
        sfe,
        smf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imf::NamedImf;
    use approx::assert_relative_eq;
    use hs_cosmo::CosmologyParams;

    fn spec() -> PipelineSpec {
        PipelineSpec {
            imf: Some("salpeter".into()),
            redshift: Some(7.0),
            halo_mass: Some(Values::from([1e7, 1e11, 1e15])),
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_matches_stages() {
        let out = run(&spec()).unwrap();
        assert_eq!(out.imf, "salpeter");
        assert_relative_eq!(out.sn_rate, 0.007421779932978433, max_relative = 1e-8);
        assert_relative_eq!(out.baryon_fraction, 0.0490 / 0.3111, max_relative = 1e-15);

        let expected_sfe = [2.52474688e-04, 1.04919512e-01, 9.81951986e-01];
        let masses = [1e7, 1e11, 1e15];
        for (i, (s, m)) in out.sfe.iter().zip(out.smf.iter()).enumerate() {
            assert_relative_eq!(s, expected_sfe[i], max_relative = 1e-8);
            assert_relative_eq!(m, masses[i] * out.baryon_fraction * s, max_relative = 1e-15);
        }
        assert_eq!(out.circular_velocity.len(), 3);
    }

    #[test]
    fn test_separate_hmf() {
        let s = PipelineSpec { hmf: Some(Values::from([1.0, 2.0, 3.0])), ..spec() };
        let out = run(&s).unwrap();
        let fb = out.baryon_fraction;
        let sfe = out.sfe.to_vec();
        assert_eq!(out.smf.to_vec(), vec![fb * sfe[0], 2.0 * fb * sfe[1], 3.0 * fb * sfe[2]]);

        let bad = PipelineSpec { hmf: Some(Values::from([1.0, 2.0])), ..spec() };
        assert!(matches!(run(&bad), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_missing_fields() {
        assert!(matches!(run(&PipelineSpec::default()), Err(Error::MissingArgument("imf"))));
        let s = PipelineSpec { redshift: None, ..spec() };
        assert!(matches!(run(&s), Err(Error::MissingArgument("redshift"))));
        let s = PipelineSpec { halo_mass: None, ..spec() };
        assert!(matches!(run(&s), Err(Error::MissingArgument("halo_mass"))));
    }

    #[test]
    fn test_bad_names() {
        let s = PipelineSpec { imf: Some("topheavy".into()), ..spec() };
        assert!(matches!(run(&s), Err(Error::InvalidImfName(_))));
        let s = PipelineSpec { cosmology: CosmologySpec::Named("nope".into()), ..spec() };
        assert!(matches!(run(&s), Err(Error::UnknownCosmology(_))));
    }

    #[test]
    fn test_from_json() {
        let s = PipelineSpec::from_json(
            r#"{
                "imf": "Kroupa",
                "redshift": 6,
                "cosmology": {"H0": 70.0, "Om0": 0.3, "Ob0": 0.045},
                "halo_mass": 1e10,
                "feedback": {"f_gas": 0.5}
            }"#,
        )
        .unwrap();
        assert_eq!(s.cosmology, CosmologySpec::Params(CosmologyParams::new(70.0, 0.3, 0.045)));
        assert_eq!(s.snrate, SnRateConfig::default());
        let out = run(&s).unwrap();
        assert!(out.smf.is_scalar());
        assert_relative_eq!(out.baryon_fraction, 0.15, max_relative = 1e-15);
        assert!(matches!(PipelineSpec::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_custom_imf_via_run_with() {
        let imf = Imf::custom("salpeter-clone", |m: f64| m.powf(-2.35));
        let cosmo = hs_cosmo::from_name("planck18").unwrap();
        let hm = Values::from(1e10);
        let custom = run_with(
            &imf,
            7.0,
            &hm,
            &hm,
            &cosmo,
            &SnRateConfig::default(),
            &FeedbackParams::default(),
        )
        .unwrap();
        let named = run_with(
            &NamedImf::Salpeter.into(),
            7.0,
            &hm,
            &hm,
            &cosmo,
            &SnRateConfig::default(),
            &FeedbackParams::default(),
        )
        .unwrap();
        assert_eq!(custom.imf, "salpeter-clone");
        assert_eq!(custom.smf, named.smf);
    }
}
