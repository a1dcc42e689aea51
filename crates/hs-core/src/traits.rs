//! Core traits for hmf2smf
//!
//! Feedback and stellar-mass-function code only ever reads a cosmology
//! through [`Cosmology`], so background models live in their own crate
//! (hs-cosmo) and callers can plug in their own.

/// Background cosmology as seen by the feedback model.
///
/// Implementations only need the matter density parameter as a function of
/// redshift and the present-day baryon and matter densities.
pub trait Cosmology: Send + Sync {
    /// Matter density parameter Ω_m(z) at redshift `z`.
    fn om(&self, z: f64) -> f64;

    /// Present-day baryon density parameter Ω_b0.
    fn ob0(&self) -> f64;

    /// Present-day matter density parameter Ω_m0.
    fn om0(&self) -> f64;

    /// Cosmic baryon fraction Ω_b0 / Ω_m0.
    fn baryon_fraction(&self) -> f64 {
        self.ob0() / self.om0()
    }
}

impl<C: Cosmology + ?Sized> Cosmology for &C {
    fn om(&self, z: f64) -> f64 {
        (**self).om(z)
    }

    fn ob0(&self) -> f64 {
        (**self).ob0()
    }

    fn om0(&self) -> f64 {
        (**self).om0()
    }
}

impl<C: Cosmology + ?Sized> Cosmology for Box<C> {
    fn om(&self, z: f64) -> f64 {
        (**self).om(z)
    }

    fn ob0(&self) -> f64 {
        (**self).ob0()
    }

    fn om0(&self) -> f64 {
        (**self).om0()
    }
}
