//! Field tensor evaluation on a provider.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use rayon::prelude::*;

use crate::backend::{BackendProvider, Capabilities, ExecutionContext, run_in_context};
use crate::config::DipoleConfig;
use crate::error::Result;
use crate::field::{FieldSource, FieldTensor, OscillatingDipole, SpacetimePoint, UPPER_SLOTS};
use crate::registry::BackendRegistry;

/// Evaluates [`FieldTensor`]s from a [`FieldSource`] inside contexts of a
/// chosen provider.
///
/// With a `PARALLEL` provider the six upper-triangle components are
/// computed concurrently in the provider's pool. Otherwise they are computed
/// one after another on the calling thread. Both paths produce identical
/// bits.
///
/// ```
/// use std::sync::Arc;
/// use ndcompute::backend::MulticoreCpuBackend;
/// use ndcompute::field::{FieldTensorKernel, SpacetimePoint};
/// use ndcompute::DipoleConfig;
///
/// let provider = Arc::new(MulticoreCpuBackend::new().unwrap());
/// let kernel = FieldTensorKernel::with_dipole(provider, &DipoleConfig::default());
/// let f = kernel.evaluate(&SpacetimePoint::new(10.0, 2.0, 0.0, 0.0)).unwrap();
/// assert!(f.is_antisymmetric());
/// assert!(f.max_abs() > 1e-15);
/// ```
#[derive(Clone)]
pub struct FieldTensorKernel {
    provider: Arc<dyn BackendProvider<f64>>,
    source: Arc<dyn FieldSource>,
}

impl FieldTensorKernel {
    pub fn new(provider: Arc<dyn BackendProvider<f64>>, source: Arc<dyn FieldSource>) -> Self {
        debug!("field kernel on provider `{}`", provider.name());
        Self { provider, source }
    }

    /// Kernel for an [`OscillatingDipole`] built from `config`.
    pub fn with_dipole(provider: Arc<dyn BackendProvider<f64>>, config: &DipoleConfig) -> Self {
        Self::new(provider, Arc::new(OscillatingDipole::new(config)))
    }

    /// Kernel on the first parallel provider in `registry`, or on any
    /// provider that can construct tensors.
    ///
    /// # Errors
    ///
    /// `NoBackendAvailable` if neither kind is registered and available.
    pub fn from_registry(
        registry: &BackendRegistry<f64>,
        source: Arc<dyn FieldSource>,
    ) -> Result<Self> {
        let provider = registry.select_with_fallback(&[
            Capabilities::PARALLEL,
            Capabilities::TENSOR_CONSTRUCTION,
        ])?;
        Ok(Self::new(provider, source))
    }

    pub fn provider(&self) -> &Arc<dyn BackendProvider<f64>> {
        &self.provider
    }

    pub fn source(&self) -> &Arc<dyn FieldSource> {
        &self.source
    }

    /// Field tensor at `point`, computed in one context of the provider.
    ///
    /// # Errors
    ///
    /// `BackendUnavailable` if the provider cannot open a context.
    pub fn evaluate(&self, point: &SpacetimePoint) -> Result<FieldTensor> {
        run_in_context(self.provider.as_ref(), |ctx| self.evaluate_in(ctx, point))
    }

    /// Field tensor at `point` on the calling thread, without a context.
    pub fn evaluate_sequential(&self, point: &SpacetimePoint) -> FieldTensor {
        let mut upper = [0.0; 6];
        for (slot, &(mu, nu)) in upper.iter_mut().zip(UPPER_SLOTS.iter()) {
            *slot = self.source.component(point, mu, nu);
        }
        FieldTensor::from_upper(upper)
    }

    /// Field tensors at each of `points`, in order, sharing one context.
    ///
    /// # Errors
    ///
    /// `BackendUnavailable` if the provider cannot open a context.
    pub fn evaluate_many(&self, points: &[SpacetimePoint]) -> Result<Vec<FieldTensor>> {
        run_in_context(self.provider.as_ref(), |ctx| {
            points
                .iter()
                .map(|point| self.evaluate_in(ctx, point))
                .collect()
        })
    }

    fn evaluate_in(&self, ctx: &ExecutionContext, point: &SpacetimePoint) -> Result<FieldTensor> {
        if !self.provider.supports_parallel_ops() {
            warn!(
                "provider `{}` lacks PARALLEL; evaluating field sequentially",
                self.provider.name()
            );
            return Ok(self.evaluate_sequential(point));
        }
        let source = self.source.as_ref();
        let upper = ctx.install(|| {
            let mut upper = [0.0; 6];
            upper
                .par_iter_mut()
                .zip(UPPER_SLOTS.par_iter())
                .for_each(|(slot, &(mu, nu))| *slot = source.component(point, mu, nu));
            upper
        })?;
        Ok(FieldTensor::from_upper(upper))
    }
}

impl fmt::Debug for FieldTensorKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTensorKernel")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}
