//! Stellar mass function from a halo mass function.

use hs_core::{Cosmology, Result, Values};

/// `smf = hmf · (Ω_b0 / Ω_m0) · sfe`, element-wise.
///
/// A scalar `hmf` or `sfe` broadcasts against the other operand; two arrays
/// must have the same length or [`hs_core::Error::ShapeMismatch`] is returned.
/// Both operands must be finite and non-negative. `sfe` is not capped at 1.
pub fn stellar_mass_function(hmf: &Values, sfe: &Values, cosmo: &dyn Cosmology) -> Result<Values> {
    hmf.validate_non_negative("hmf")?;
    sfe.validate_non_negative("sfe")?;
    let baryon_fraction = cosmo.baryon_fraction();
    hmf.zip_with(sfe, |h, e| h * baryon_fraction * e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hs_core::Error;
    use hs_cosmo::FlatLambdaCdm;

    fn planck18() -> FlatLambdaCdm {
        hs_cosmo::from_name("planck18").unwrap()
    }

    fn assert_all_close(actual: &Values, expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(a, *e, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_reference_arrays() {
        let smf = stellar_mass_function(
            &Values::from([1e7, 1e11, 1e15]),
            &Values::from([10.0, 20.0, 30.0]),
            &planck18(),
        )
        .unwrap();
        assert_all_close(&smf, &[1.57505625e+07, 3.15011250e+11, 4.72516876e+15]);
    }

    #[test]
    fn test_scalar_hmf_broadcasts() {
        let smf =
            stellar_mass_function(&Values::from(1e7), &Values::from([10.0, 20.0, 30.0]), &planck18())
                .unwrap();
        assert_eq!(smf.shape(), Some(3));
        assert_all_close(&smf, &[15750562.52009001, 31501125.04018001, 47251687.56027002]);
    }

    #[test]
    fn test_scalar_sfe_broadcasts() {
        let smf =
            stellar_mass_function(&Values::from([1e7, 1e11, 1e15]), &Values::from(0.5), &planck18())
                .unwrap();
        assert_all_close(&smf, &[7.87528126e+05, 7.87528126e+09, 7.87528126e+13]);
    }

    #[test]
    fn test_scalar_scalar() {
        let smf = stellar_mass_function(&Values::from(2e10), &Values::from(0.1), &planck18()).unwrap();
        assert_relative_eq!(smf.as_scalar().unwrap(), 2e10 * 0.0490 / 0.3111 * 0.1, max_relative = 1e-15);
    }

    #[test]
    fn test_shape_mismatch() {
        let r = stellar_mass_function(
            &Values::from([1e7, 1e11, 1e15]),
            &Values::from([50.0, 10.0]),
            &planck18(),
        );
        assert!(matches!(r, Err(Error::ShapeMismatch { left: 3, right: 2 })));
    }

    #[test]
    fn test_negative_input_rejected() {
        let r = stellar_mass_function(&Values::from(1e7), &Values::from(-0.1), &planck18());
        assert!(matches!(r, Err(Error::Validation(_))));
    }
}
