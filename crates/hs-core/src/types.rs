//! Common data types for hmf2smf

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A scalar or a one-dimensional array of values.
///
/// Halo mass functions, halo masses, star-formation efficiencies and stellar
/// mass functions may each be given per mass bin or as a single number. Mixed
/// operands broadcast the scalar across the array; two arrays must have the
/// same length.
///
/// Deserializes from either a JSON number or a JSON array of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    /// A single value
    Scalar(f64),
    /// One value per bin
    Array(Vec<f64>),
}

impl Values {
    /// Array length, or `None` for a scalar.
    pub fn shape(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Array(v) => Some(v.len()),
        }
    }

    /// Number of stored values (1 for a scalar).
    pub fn len(&self) -> usize {
        self.shape().unwrap_or(1)
    }

    /// True for an empty array.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Array(v) if v.is_empty())
    }

    /// True if this is a scalar.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// The scalar value, if any.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(x) => Some(*x),
            Self::Array(_) => None,
        }
    }

    /// View the stored values as a slice (length 1 for a scalar).
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Scalar(x) => std::slice::from_ref(x),
            Self::Array(v) => v,
        }
    }

    /// Iterate over the stored values.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }

    /// Copy the values into a `Vec` (length 1 for a scalar).
    pub fn to_vec(&self) -> Vec<f64> {
        self.as_slice().to_vec()
    }

    /// Apply `f` element-wise, preserving shape.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        match self {
            Self::Scalar(x) => Self::Scalar(f(*x)),
            Self::Array(v) => Self::Array(v.iter().map(|&x| f(x)).collect()),
        }
    }

    /// Combine two operands element-wise with broadcasting.
    ///
    /// Scalars broadcast against arrays. Two arrays must have equal length,
    /// otherwise [`Error::ShapeMismatch`] is returned.
    pub fn zip_with(&self, other: &Values, mut f: impl FnMut(f64, f64) -> f64) -> Result<Values> {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => Ok(Self::Scalar(f(*a, *b))),
            (Self::Scalar(a), Self::Array(b)) => {
                Ok(Self::Array(b.iter().map(|&y| f(*a, y)).collect()))
            }
            (Self::Array(a), Self::Scalar(b)) => {
                Ok(Self::Array(a.iter().map(|&x| f(x, *b)).collect()))
            }
            (Self::Array(a), Self::Array(b)) => {
                if a.len() != b.len() {
                    return Err(Error::ShapeMismatch { left: a.len(), right: b.len() });
                }
                Ok(Self::Array(a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()))
            }
        }
    }

    /// Ensure every value is finite and non-negative.
    ///
    /// `what` names the quantity in the error message.
    pub fn validate_non_negative(&self, what: &str) -> Result<()> {
        if let Some((i, x)) = self.iter().enumerate().find(|(_, x)| !x.is_finite() || *x < 0.0) {
            return Err(Error::Validation(format!(
                "{what} must be finite and >= 0, got {x} at index {i}"
            )));
        }
        Ok(())
    }
}

impl From<f64> for Values {
    fn from(x: f64) -> Self {
        Self::Scalar(x)
    }
}

impl From<Vec<f64>> for Values {
    fn from(v: Vec<f64>) -> Self {
        Self::Array(v)
    }
}

impl From<&[f64]> for Values {
    fn from(v: &[f64]) -> Self {
        Self::Array(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Values {
    fn from(v: [f64; N]) -> Self {
        Self::Array(v.to_vec())
    }
}
