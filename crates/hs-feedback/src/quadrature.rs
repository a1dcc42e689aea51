//! Adaptive numerical integration on bounded 1-D intervals.
//!
//! Globally adaptive Gauss-Kronrod quadrature: each subinterval is integrated
//! with the 15-point Kronrod rule, the embedded 7-point Gauss rule gives the
//! local error estimate, and the subinterval with the largest error is
//! bisected until the summed error meets the tolerance.
//!
//! Known discontinuities can be passed as breakpoints; the range is split
//! there before any bisection so no rule ever straddles a jump.

use hs_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Kronrod abscissae on `[0, 1]` (odd indices are the Gauss nodes; last is the center).
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

/// Kronrod weights aligned with [`XGK`].
const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for `XGK[1]`, `XGK[3]`, `XGK[5]` and the center.
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Function evaluations per Gauss-Kronrod panel.
const EVALS_PER_PANEL: usize = 15;

fn default_abs_tol() -> f64 {
    0.0
}

fn default_rel_tol() -> f64 {
    1e-10
}

fn default_max_intervals() -> usize {
    200
}

/// Convergence controls for [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadratureConfig {
    /// Absolute error target
    #[serde(default = "default_abs_tol")]
    pub abs_tol: f64,
    /// Relative error target
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    /// Maximum number of subintervals before giving up
    #[serde(default = "default_max_intervals")]
    pub max_intervals: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            abs_tol: default_abs_tol(),
            rel_tol: default_rel_tol(),
            max_intervals: default_max_intervals(),
        }
    }
}

impl QuadratureConfig {
    fn validate(&self) -> Result<()> {
        if !self.abs_tol.is_finite() || !self.rel_tol.is_finite() {
            return Err(Error::Validation("quadrature tolerances must be finite".to_string()));
        }
        if self.abs_tol < 0.0 || self.rel_tol < 0.0 {
            return Err(Error::Validation("quadrature tolerances must be >= 0".to_string()));
        }
        if self.abs_tol == 0.0 && self.rel_tol == 0.0 {
            return Err(Error::Validation(
                "at least one of abs_tol / rel_tol must be > 0".to_string(),
            ));
        }
        if self.max_intervals == 0 {
            return Err(Error::Validation("max_intervals must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Integral estimate and bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadratureResult {
    /// Integral estimate
    pub value: f64,
    /// Estimated absolute error
    pub abs_error: f64,
    /// Number of integrand evaluations
    pub n_evals: usize,
    /// Number of subintervals in the final partition
    pub n_intervals: usize,
}

#[derive(Debug, Clone, Copy)]
struct Panel {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

fn eval<F: Fn(f64) -> f64>(f: &F, x: f64) -> Result<f64> {
    let y = f(x);
    if !y.is_finite() {
        return Err(Error::Computation(format!("integrand is not finite at x={x}: {y}")));
    }
    Ok(y)
}

/// 15-point Kronrod estimate on `[a, b]` with the 7-point Gauss difference as error.
fn gauss_kronrod_15<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> Result<Panel> {
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let fc = eval(f, center)?;
    let mut kronrod = WGK[7] * fc;
    let mut gauss = WG[3] * fc;

    for j in 0..7 {
        let dx = half * XGK[j];
        let sum = eval(f, center - dx)? + eval(f, center + dx)?;
        kronrod += WGK[j] * sum;
        if j % 2 == 1 {
            gauss += WG[j / 2] * sum;
        }
    }

    Ok(Panel { a, b, value: kronrod * half, error: ((kronrod - gauss) * half).abs() })
}

/// Index of the panel with the largest error estimate.
fn worst_panel(panels: &[Panel]) -> usize {
    panels
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, err), (i, p)| {
            if p.error > err { (i, p.error) } else { (best, err) }
        })
        .0
}

/// Integrate `f` over `[a, b]`.
///
/// `a > b` returns the negated integral over `[b, a]`; `a == b` returns zero.
pub fn integrate<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    config: &QuadratureConfig,
) -> Result<QuadratureResult> {
    integrate_with_breakpoints(f, a, b, &[], config)
}

/// Integrate `f` over `[a, b]`, splitting first at every breakpoint strictly inside the range.
pub fn integrate_with_breakpoints<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    breakpoints: &[f64],
    config: &QuadratureConfig,
) -> Result<QuadratureResult> {
    config.validate()?;
    if !a.is_finite() || !b.is_finite() {
        return Err(Error::Validation(format!(
            "integration bounds must be finite, got [{a}, {b}]"
        )));
    }
    if a == b {
        return Ok(QuadratureResult { value: 0.0, abs_error: 0.0, n_evals: 0, n_intervals: 0 });
    }
    if a > b {
        let r = integrate_with_breakpoints(f, b, a, breakpoints, config)?;
        return Ok(QuadratureResult { value: -r.value, ..r });
    }

    let mut edges = vec![a];
    let mut interior: Vec<f64> =
        breakpoints.iter().copied().filter(|&x| x.is_finite() && x > a && x < b).collect();
    interior.sort_by(f64::total_cmp);
    interior.dedup();
    edges.extend(interior);
    edges.push(b);

    let mut panels = Vec::with_capacity(config.max_intervals.max(edges.len()));
    for w in edges.windows(2) {
        panels.push(gauss_kronrod_15(&f, w[0], w[1])?);
    }
    let mut n_evals = EVALS_PER_PANEL * panels.len();

    loop {
        let value: f64 = panels.iter().map(|p| p.value).sum();
        let abs_error: f64 = panels.iter().map(|p| p.error).sum();
        let tol = config.abs_tol.max(config.rel_tol * value.abs());

        if abs_error <= tol {
            log::debug!(
                "integrate [{a}, {b}]: value={value:.12e} err={abs_error:.3e} panels={} evals={n_evals}",
                panels.len()
            );
            return Ok(QuadratureResult { value, abs_error, n_evals, n_intervals: panels.len() });
        }

        if panels.len() >= config.max_intervals {
            return Err(Error::Computation(format!(
                "quadrature on [{a}, {b}] did not converge within {} intervals \
                 (estimate {value:e}, error {abs_error:e}, tolerance {tol:e})",
                config.max_intervals
            )));
        }

        let worst = panels.swap_remove(worst_panel(&panels));
        let mid = 0.5 * (worst.a + worst.b);
        if mid <= worst.a || mid >= worst.b {
            return Err(Error::Computation(format!(
                "quadrature on [{a}, {b}] hit roundoff: cannot bisect [{}, {}] further \
                 (estimate {value:e}, error {abs_error:e})",
                worst.a, worst.b
            )));
        }

        panels.push(gauss_kronrod_15(&f, worst.a, mid)?);
        panels.push(gauss_kronrod_15(&f, mid, worst.b)?);
        n_evals += 2 * EVALS_PER_PANEL;
    }
}
