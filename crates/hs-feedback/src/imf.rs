//! Initial mass functions.
//!
//! An IMF is either one of the built-in named models or a caller-supplied
//! weighting function. Both resolve to a [`MassDensity`], which is all the
//! supernova-rate integrator needs.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use hs_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Unnormalized stellar mass density `w(m)`, mass in solar masses.
pub trait MassDensity: Send + Sync {
    /// Weight at mass `m`.
    fn weight(&self, m: f64) -> f64;

    /// Masses where `w` is discontinuous or has a kink.
    ///
    /// Quadrature splits the integration range at these points.
    fn breakpoints(&self) -> &[f64] {
        &[]
    }
}

impl<F> MassDensity for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn weight(&self, m: f64) -> f64 {
        self(m)
    }
}

/// Built-in IMF models.
///
/// Serializes as its lower-case name and deserializes from any casing of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum NamedImf {
    /// Salpeter (1955): single power law `m^-2.35`.
    Salpeter,
    /// Kroupa (2002): broken power law with breaks at 0.08 and 0.5 M☉.
    Kroupa,
}

const KROUPA_BREAKS: [f64; 2] = [0.08, 0.5];

impl NamedImf {
    /// Every built-in model.
    pub const ALL: [NamedImf; 2] = [NamedImf::Salpeter, NamedImf::Kroupa];

    /// Lower-case canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Salpeter => "salpeter",
            Self::Kroupa => "kroupa",
        }
    }

    /// Weight at mass `m`.
    ///
    /// Kroupa segments are tested as `m > 0.5`, then `m < 0.08`, else the
    /// middle slope, so both break masses belong to the middle segment.
    pub fn weight(self, m: f64) -> f64 {
        match self {
            Self::Salpeter => m.powf(-2.35),
            Self::Kroupa => {
                if m > 0.5 {
                    m.powf(-2.3)
                } else if m < 0.08 {
                    m.powf(-0.3)
                } else {
                    m.powf(-1.3)
                }
            }
        }
    }
}

impl fmt::Display for NamedImf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedImf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "salpeter" => Ok(Self::Salpeter),
            "kroupa" => Ok(Self::Kroupa),
            _ => Err(Error::InvalidImfName(s.to_string())),
        }
    }
}

impl TryFrom<String> for NamedImf {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<NamedImf> for &'static str {
    fn from(imf: NamedImf) -> Self {
        imf.name()
    }
}

impl MassDensity for NamedImf {
    fn weight(&self, m: f64) -> f64 {
        NamedImf::weight(*self, m)
    }

    fn breakpoints(&self) -> &[f64] {
        match self {
            Self::Salpeter => &[],
            Self::Kroupa => &KROUPA_BREAKS,
        }
    }
}

/// A caller-supplied IMF.
///
/// The function is used as given; nothing about its shape is checked.
#[derive(Clone)]
pub struct CustomImf {
    label: String,
    func: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    breakpoints: Vec<f64>,
}

impl CustomImf {
    /// Wrap `func` under a display label.
    pub fn new(label: impl Into<String>, func: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self { label: label.into(), func: Arc::new(func), breakpoints: Vec::new() }
    }

    /// Declare masses where `func` is discontinuous.
    pub fn with_breakpoints(mut self, breakpoints: impl Into<Vec<f64>>) -> Self {
        self.breakpoints = breakpoints.into();
        self
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for CustomImf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomImf")
            .field("label", &self.label)
            .field("breakpoints", &self.breakpoints)
            .finish_non_exhaustive()
    }
}

impl MassDensity for CustomImf {
    fn weight(&self, m: f64) -> f64 {
        (self.func)(m)
    }

    fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }
}

/// An initial mass function: a built-in model or a custom function.
#[derive(Debug, Clone)]
pub enum Imf {
    /// Built-in model
    Named(NamedImf),
    /// Caller-supplied function
    Custom(CustomImf),
}

impl Imf {
    /// Resolve a built-in model by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::Named(name.parse()?))
    }

    /// Wrap a custom weighting function.
    pub fn custom(label: impl Into<String>, func: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(CustomImf::new(label, func))
    }

    /// Model name or custom label.
    pub fn name(&self) -> &str {
        match self {
            Self::Named(n) => n.name(),
            Self::Custom(c) => c.label(),
        }
    }

    /// The density to integrate.
    pub fn resolve(&self) -> &dyn MassDensity {
        match self {
            Self::Named(n) => n,
            Self::Custom(c) => c,
        }
    }
}

impl fmt::Display for Imf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Imf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl From<NamedImf> for Imf {
    fn from(n: NamedImf) -> Self {
        Self::Named(n)
    }
}

impl From<CustomImf> for Imf {
    fn from(c: CustomImf) -> Self {
        Self::Custom(c)
    }
}

impl MassDensity for Imf {
    fn weight(&self, m: f64) -> f64 {
        self.resolve().weight(m)
    }

    fn breakpoints(&self) -> &[f64] {
        self.resolve().breakpoints()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_serde_uses_names() {
        let imf: NamedImf = serde_json::from_str(r#""KROUPA""#).unwrap();
        assert_eq!(imf, NamedImf::Kroupa);
        assert_eq!(serde_json::to_string(&NamedImf::Salpeter).unwrap(), r#""salpeter""#);

        let all: Vec<NamedImf> = serde_json::from_str(r#"["salpeter", "Kroupa"]"#).unwrap();
        assert_eq!(all, NamedImf::ALL);

        let err = serde_json::from_str::<NamedImf>(r#""topheavy""#).unwrap_err();
        assert!(err.to_string().contains("Unknown initial mass function 'topheavy'"), "{err}");
    }

    #[test]
    fn test_names_case_insensitive() {
        assert_eq!("SALPETER".parse::<NamedImf>().unwrap(), NamedImf::Salpeter);
        assert_eq!("Kroupa".parse::<NamedImf>().unwrap(), NamedImf::Kroupa);
        assert_eq!(Imf::from_name("kRoUpA").unwrap().name(), "kroupa");
    }

    #[test]
    fn test_unknown_name() {
        match Imf::from_name("topheavy") {
            Err(Error::InvalidImfName(name)) => assert_eq!(name, "topheavy"),
            other => panic!("expected InvalidImfName, got {:?}", other),
        }
    }

    #[test]
    fn test_salpeter() {
        let imf = NamedImf::Salpeter;
        assert_relative_eq!(imf.weight(1.0), 1.0);
        assert_relative_eq!(imf.weight(10.0), 10f64.powf(-2.35), max_relative = 1e-15);
        assert!(MassDensity::breakpoints(&imf).is_empty());
    }

    #[test]
    fn test_kroupa_segments() {
        let imf = NamedImf::Kroupa;
        assert_eq!(imf.weight(0.05), 0.05f64.powf(-0.3));
        assert_eq!(imf.weight(0.2), 0.2f64.powf(-1.3));
        assert_eq!(imf.weight(2.0), 2.0f64.powf(-2.3));
    }

    #[test]
    fn test_kroupa_break_masses_use_middle_slope() {
        let imf = NamedImf::Kroupa;
        assert_eq!(imf.weight(0.08), 0.08f64.powf(-1.3));
        assert_eq!(imf.weight(0.5), 0.5f64.powf(-1.3));
        assert_eq!(MassDensity::breakpoints(&imf), &[0.08, 0.5]);
    }

    #[test]
    fn test_custom_imf_used_unchanged() {
        let imf = Imf::custom("flat", |_m| 1.0);
        assert_eq!(imf.name(), "flat");
        assert_eq!(imf.weight(3.0), 1.0);
        assert_eq!(imf.weight(-3.0), 1.0);

        let stepped = CustomImf::new("step", |m| if m < 1.0 { 2.0 } else { 1.0 })
            .with_breakpoints(vec![1.0]);
        assert_eq!(Imf::from(stepped).breakpoints(), &[1.0]);
    }

    #[test]
    fn test_closure_is_a_density() {
        let f = |m: f64| m * m;
        assert_eq!(f.weight(3.0), 9.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Imf::from(NamedImf::Kroupa).to_string(), "kroupa");
        assert_eq!(format!("{}", NamedImf::Salpeter), "salpeter");
        assert!(format!("{:?}", Imf::custom("mine", |m| m)).contains("mine"));
    }
}
