//! Random dense tensors, for benchmarks and property tests.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::scalar::{Scalar, c64};
use crate::tensor::DenseTensor;

/// Element types with a uniform and a normal sampler.
pub trait RandomScalar: Scalar {
    /// Uniform on `[0, 1)`; complex values sample both parts independently.
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self;

    /// Standard normal; complex values have `E|z|² = 1`.
    fn sample_normal<R: Rng>(rng: &mut R) -> Self;
}

impl RandomScalar for f64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardUniform)
    }

    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardNormal)
    }
}

impl RandomScalar for c64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        c64::new(rng.sample(StandardUniform), rng.sample(StandardUniform))
    }

    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let re: f64 = rng.sample(StandardNormal);
        let im: f64 = rng.sample(StandardNormal);
        c64::new(re * half, im * half)
    }
}

impl<ElT: RandomScalar> DenseTensor<ElT> {
    /// Uniform `[0, 1)` entries from the thread-local generator.
    pub fn random(shape: &[usize]) -> Self {
        Self::random_with_rng(shape, &mut rand::rng())
    }

    /// Uniform `[0, 1)` entries from `rng`.
    ///
    /// ```
    /// use ndcompute::DenseTensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let a: DenseTensor<f64> = DenseTensor::random_with_rng(&[3], &mut StdRng::seed_from_u64(7));
    /// let b: DenseTensor<f64> = DenseTensor::random_with_rng(&[3], &mut StdRng::seed_from_u64(7));
    /// assert_eq!(a, b);
    /// ```
    pub fn random_with_rng<R: Rng>(shape: &[usize], rng: &mut R) -> Self {
        Self::from_fn(shape, |_| ElT::sample_uniform(rng))
    }

    /// Standard normal entries from the thread-local generator.
    pub fn randn(shape: &[usize]) -> Self {
        Self::randn_with_rng(shape, &mut rand::rng())
    }

    pub fn randn_with_rng<R: Rng>(shape: &[usize], rng: &mut R) -> Self {
        Self::from_fn(shape, |_| ElT::sample_normal(rng))
    }

    /// `n × n` matrix with normal entries and a diagonal shifted by `n`.
    ///
    /// The shift makes the matrix strictly diagonally dominant with high
    /// probability, so it is comfortably invertible.
    pub fn random_invertible_with_rng<R: Rng>(n: usize, rng: &mut R) -> Self {
        let shift = ElT::from_real(n as f64);
        Self::from_fn(&[n, n], |idx| {
            let value = ElT::sample_normal(rng);
            if idx[0] == idx[1] { value + shift } else { value }
        })
    }
}
