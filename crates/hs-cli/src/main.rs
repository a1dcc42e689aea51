//! hmf2smf CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use hs_core::{Cosmology, Error, Values};
use hs_feedback::{DEFAULT_SN_ENERGY, FeedbackParams, PipelineSpec, SnRateConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hmf2smf")]
#[command(about = "hmf2smf - Stellar mass functions from halo mass functions under supernova feedback")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Supernova rate per solar mass formed for a built-in IMF
    Snrate {
        /// IMF name (salpeter, kroupa)
        #[arg(long)]
        imf: String,

        /// Lowest progenitor mass that ends as a supernova [M☉]
        #[arg(long, default_value = "8")]
        sn_threshold: f64,

        /// Lower IMF mass bound [M☉]
        #[arg(long, default_value = "0.1")]
        m_lower: f64,

        /// Upper IMF mass bound [M☉]
        #[arg(long, default_value = "100")]
        m_upper: f64,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Supernova-feedback-limited star-formation efficiency
    Sfe {
        /// Redshift
        #[arg(long)]
        redshift: f64,

        /// Halo masses [M☉]; a single value gives a scalar result
        #[arg(long, num_args = 1.., required = true)]
        halo_mass: Vec<f64>,

        /// Supernovae per solar mass formed
        #[arg(long, conflicts_with = "imf")]
        sn_rate: Option<f64>,

        /// Derive the supernova rate from this IMF (default bounds)
        #[arg(long)]
        imf: Option<String>,

        /// Fraction of supernova energy coupled to the gas
        #[arg(long, default_value = "1.0")]
        f_gas: f64,

        /// Energy per supernova [M☉ km² s⁻²]
        #[arg(long, default_value_t = DEFAULT_SN_ENERGY)]
        sn_energy: f64,

        /// Cosmology preset
        #[arg(long, default_value = "planck18")]
        cosmology: String,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stellar mass function from a halo mass function and efficiencies
    Smf {
        /// Halo mass function values
        #[arg(long, num_args = 1.., required = true)]
        hmf: Vec<f64>,

        /// Star-formation efficiencies (one value broadcasts)
        #[arg(long, num_args = 1.., required = true)]
        sfe: Vec<f64>,

        /// Cosmology preset
        #[arg(long, default_value = "planck18")]
        cosmology: String,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run IMF → supernova rate → SFE → SMF from a JSON spec
    Run {
        /// Pipeline spec (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Background quantities for a cosmology preset
    Cosmology {
        /// Preset name
        #[arg(long, default_value = "planck18")]
        name: String,

        /// Redshifts to evaluate
        #[arg(long, num_args = 1.., default_value = "0")]
        redshift: Vec<f64>,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the JSON results
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Snrate { imf, sn_threshold, m_lower, m_upper, output } => {
            let config = SnRateConfig { sn_threshold, m_lower, m_upper, ..Default::default() };
            cmd_snrate(&imf, &config, output.as_ref())
        }
        Commands::Sfe {
            redshift,
            halo_mass,
            sn_rate,
            imf,
            f_gas,
            sn_energy,
            cosmology,
            output,
        } => cmd_sfe(
            redshift,
            to_values(halo_mass),
            sn_rate,
            imf.as_deref(),
            &FeedbackParams { f_gas, sn_energy },
            &cosmology,
            output.as_ref(),
        ),
        Commands::Smf { hmf, sfe, cosmology, output } => {
            cmd_smf(to_values(hmf), to_values(sfe), &cosmology, output.as_ref())
        }
        Commands::Run { input, output } => cmd_run(&input, output.as_ref()),
        Commands::Cosmology { name, redshift, output } => {
            cmd_cosmology(&name, &redshift, output.as_ref())
        }
        Commands::Version => {
            println!("hmf2smf {}", hs_core::VERSION);
            Ok(())
        }
    }
}

/// A single CLI value is a scalar, several are an array.
fn to_values(mut v: Vec<f64>) -> Values {
    if v.len() == 1 { Values::Scalar(v.remove(0)) } else { Values::Array(v) }
}

fn cmd_snrate(imf: &str, config: &SnRateConfig, output: Option<&PathBuf>) -> Result<()> {
    let imf = hs_feedback::Imf::from_name(imf)?;
    let breakdown = hs_feedback::snrate_detailed(&imf, config)?;
    tracing::info!(imf = %imf, rate = breakdown.rate, "supernova rate computed");

    let output_json = serde_json::json!({
        "imf": imf.name(),
        "sn_threshold": config.sn_threshold,
        "m_lower": config.m_lower,
        "m_upper": config.m_upper,
        "sn_rate": breakdown.rate,
        "progenitors": breakdown.progenitors,
        "stellar_mass": breakdown.stellar_mass,
    });

    write_json(output, output_json)
}

fn cmd_sfe(
    redshift: f64,
    halo_mass: Values,
    sn_rate: Option<f64>,
    imf: Option<&str>,
    params: &FeedbackParams,
    cosmology: &str,
    output: Option<&PathBuf>,
) -> Result<()> {
    let cosmo = hs_cosmo::from_name(cosmology)?;
    let sn_rate = match (sn_rate, imf) {
        (Some(rate), _) => rate,
        (None, Some(name)) => hs_feedback::snrate_named(name, &SnRateConfig::default())?,
        (None, None) => return Err(Error::MissingArgument("sn_rate").into()),
    };

    let sfe = hs_feedback::sfe_sn_feedback(redshift, &halo_mass, &cosmo, sn_rate, params)?;
    tracing::info!(redshift, sn_rate, n_bins = sfe.len(), "star-formation efficiency computed");

    let output_json = serde_json::json!({
        "cosmology": cosmology.to_lowercase(),
        "redshift": redshift,
        "sn_rate": sn_rate,
        "f_gas": params.f_gas,
        "sn_energy": params.sn_energy,
        "halo_mass": halo_mass,
        "circular_velocity": hs_feedback::circular_velocities(&halo_mass, redshift, &cosmo),
        "sfe": sfe,
    });

    write_json(output, output_json)
}

fn cmd_smf(hmf: Values, sfe: Values, cosmology: &str, output: Option<&PathBuf>) -> Result<()> {
    let cosmo = hs_cosmo::from_name(cosmology)?;
    let smf = hs_feedback::stellar_mass_function(&hmf, &sfe, &cosmo)?;
    tracing::info!(n_bins = smf.len(), "stellar mass function computed");

    let output_json = serde_json::json!({
        "cosmology": cosmology.to_lowercase(),
        "baryon_fraction": cosmo.baryon_fraction(),
        "smf": smf,
    });

    write_json(output, output_json)
}

fn cmd_run(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    tracing::info!(path = %input.display(), "loading pipeline spec");
    let json = std::fs::read_to_string(input)?;
    let spec = PipelineSpec::from_json(&json)?;

    let result = hs_feedback::pipeline::run(&spec)?;
    tracing::info!(
        imf = %result.imf,
        redshift = result.redshift,
        sn_rate = result.sn_rate,
        n_bins = result.smf.len(),
        "pipeline complete"
    );

    write_json(output, serde_json::to_value(&result)?)
}

fn cmd_cosmology(name: &str, redshifts: &[f64], output: Option<&PathBuf>) -> Result<()> {
    let cosmo = hs_cosmo::from_name(name)?;
    let rows: Vec<serde_json::Value> = redshifts
        .iter()
        .map(|&z| {
            serde_json::json!({
                "z": z,
                "Om": cosmo.om(z),
                "Ez": cosmo.ez(z),
                "Hz": cosmo.hz(z),
                "virial_overdensity": hs_feedback::virial_overdensity(z, &cosmo),
            })
        })
        .collect();

    let output_json = serde_json::json!({
        "name": name.to_lowercase(),
        "params": cosmo.params(),
        "Or0": cosmo.or0(),
        "Ode0": cosmo.ode0(),
        "baryon_fraction": cosmo.baryon_fraction(),
        "redshifts": rows,
    });

    write_json(output, output_json)
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
