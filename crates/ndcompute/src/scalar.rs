//! Scalar trait for tensor element types.

use faer_traits::ComplexField;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

pub use faer::c64;

/// Trait for scalar types supported by ndcompute.
///
/// This trait wraps faer's `ComplexField` with the arithmetic operators the
/// kernels are written against. Equality is exact; tolerances are applied by
/// callers through [`Scalar::modulus`].
pub trait Scalar:
    ComplexField
    + Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Embed a real number.
    fn from_real(value: f64) -> Self;

    /// Absolute value (modulus for complex numbers).
    fn modulus(self) -> f64;

    /// Ordering used for comparisons.
    ///
    /// Reals are ordered numerically; complex values by modulus.
    fn partial_order(&self, other: &Self) -> Option<Ordering>;
}

impl Scalar for f64 {
    fn one() -> Self {
        1.0
    }

    fn from_real(value: f64) -> Self {
        value
    }

    fn modulus(self) -> f64 {
        self.abs()
    }

    fn partial_order(&self, other: &Self) -> Option<Ordering> {
        self.partial_cmp(other)
    }
}

impl Scalar for c64 {
    fn one() -> Self {
        c64::new(1.0, 0.0)
    }

    fn from_real(value: f64) -> Self {
        c64::new(value, 0.0)
    }

    fn modulus(self) -> f64 {
        self.re.hypot(self.im)
    }

    fn partial_order(&self, other: &Self) -> Option<Ordering> {
        self.modulus().partial_cmp(&other.modulus())
    }
}
