//! Naive loop-based provider.

use std::sync::Arc;

use log::debug;

use crate::backend::{
    BackendProvider, Capabilities, ContextResources, ContextTracker, ExecutionContext, Provider,
    run_in_context,
};
use crate::config::ComputeConfig;
use crate::error::Result;
use crate::operations;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Provider using naive sequential loops.
///
/// Always available. Suitable for small tensors and as the reference the
/// other providers are checked against.
#[derive(Debug)]
pub struct NaiveCpuBackend {
    singular_epsilon: f64,
    tracker: Arc<ContextTracker>,
}

impl NaiveCpuBackend {
    pub const NAME: &'static str = "naive-cpu";

    pub fn new() -> Self {
        Self::from_valid_config(&ComputeConfig::default())
    }

    /// # Errors
    ///
    /// `Config` if `config` fails [`ComputeConfig::validate`].
    pub fn with_config(config: &ComputeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &ComputeConfig) -> Self {
        debug!(
            "constructing {} provider (singular_epsilon = {:e})",
            Self::NAME,
            config.singular_epsilon
        );
        Self {
            singular_epsilon: config.singular_epsilon,
            tracker: ContextTracker::new(),
        }
    }
}

impl Default for NaiveCpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for NaiveCpuBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::TENSOR_CONSTRUCTION | Capabilities::ELEMENTWISE | Capabilities::LINEAR_ALGEBRA
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_context(&self) -> Result<ExecutionContext> {
        Ok(ExecutionContext::open(
            Self::NAME,
            ContextResources::Sequential,
            &self.tracker,
        ))
    }

    fn active_contexts(&self) -> usize {
        self.tracker.active()
    }
}

impl<ElT: Scalar> BackendProvider<ElT> for NaiveCpuBackend {
    fn add(&self, a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| operations::add(a, b))
    }

    fn subtract(&self, a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| operations::subtract(a, b))
    }

    fn multiply(&self, a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| operations::multiply(a, b))
    }

    fn scale(&self, a: &DenseTensor<ElT>, alpha: ElT) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| Ok(operations::scale(a, alpha)))
    }

    fn transpose(&self, matrix: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| operations::transpose(matrix))
    }

    fn dot(&self, a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<ElT> {
        run_in_context(self, |_| operations::dot(a, b))
    }

    fn norm(&self, a: &DenseTensor<ElT>) -> Result<f64> {
        run_in_context(self, |_| Ok(operations::norm(a)))
    }

    fn inverse(&self, matrix: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| operations::inverse(matrix, self.singular_epsilon))
    }

    fn determinant(&self, matrix: &DenseTensor<ElT>) -> Result<ElT> {
        run_in_context(self, |_| operations::determinant(matrix))
    }
}
