//! Interchangeable computation providers.
//!
//! Every provider implements [`BackendProvider`]. Kernels open an
//! [`ExecutionContext`], run inside it, and release it before returning, so
//! a provider with no live contexts before a call has none after it.
//!
//! # Providers
//!
//! - [`NaiveCpuBackend`]: sequential loops
//! - [`MulticoreCpuBackend`]: rayon thread pool, faer GEMM
//! - [`GpuSparseBackend`]: construction only, gated on a device probe
//!
//! # faer Integration
//!
//! The `faer_interop` module provides zero-copy row-major views of tensors
//! as faer matrices for the multicore matrix product.

mod capability;
mod context;
mod faer_interop;
mod gpu_sparse;
mod multicore;
mod naive;

pub use capability::Capabilities;
pub use context::{ContextResources, ContextTracker, ExecutionContext};
pub use faer_interop::{AsFaerMat, tensor_from_faer_mat};
pub use gpu_sparse::{DeviceProbe, GpuSparseBackend};
pub use multicore::MulticoreCpuBackend;
pub use naive::NaiveCpuBackend;

use crate::error::{Result, TensorError};
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Identity, capabilities and resources of a provider.
///
/// Independent of the element type, so contexts and availability checks do
/// not depend on which [`BackendProvider`] instantiation is in use.
pub trait Provider: Send + Sync {
    /// Provider name; need not be unique.
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Live check; never fails.
    fn is_available(&self) -> bool;

    /// Open a context holding this provider's resources.
    ///
    /// # Errors
    ///
    /// `BackendUnavailable` when [`Provider::is_available`] is false.
    fn create_context(&self) -> Result<ExecutionContext>;

    /// Contexts created and not yet released.
    fn active_contexts(&self) -> usize;

    fn supports_gpu(&self) -> bool {
        self.capabilities().contains(Capabilities::GPU)
    }

    fn supports_parallel_ops(&self) -> bool {
        self.capabilities().contains(Capabilities::PARALLEL)
    }
}

/// Tensor kernels of a computation engine.
///
/// Construction kernels have default implementations that run inside a
/// context from [`Provider::create_context`]. Arithmetic and linear
/// algebra kernels default to [`TensorError::UnsupportedOperation`];
/// providers override the ones they implement and advertise them through
/// [`Provider::capabilities`].
///
/// The trait is object safe and used as `Arc<dyn BackendProvider<ElT>>`.
pub trait BackendProvider<ElT: Scalar>: Provider {
    /// # Errors
    ///
    /// `ShapeMismatch` if the element count of `shape` overflows `usize`.
    fn zeros(&self, shape: &[usize]) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| DenseTensor::try_zeros(shape))
    }

    fn ones(&self, shape: &[usize]) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| DenseTensor::try_full(shape, ElT::one()))
    }

    /// Tensor from row-major `data`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `data.len()` differs from the shape's element count
    /// or that count overflows.
    fn create(&self, data: Vec<ElT>, shape: &[usize]) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |_| DenseTensor::from_vec(data, shape))
    }

    /// Element-wise sum of equally shaped tensors.
    fn add(&self, _a: &DenseTensor<ElT>, _b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        Err(TensorError::unsupported(self.name(), "add"))
    }

    /// Element-wise difference of equally shaped tensors.
    fn subtract(&self, _a: &DenseTensor<ElT>, _b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        Err(TensorError::unsupported(self.name(), "subtract"))
    }

    /// Matrix product for rank-2 · rank-2, matrix-vector product for
    /// rank-2 · rank-1, element-wise product otherwise.
    fn multiply(&self, _a: &DenseTensor<ElT>, _b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        Err(TensorError::unsupported(self.name(), "multiply"))
    }

    fn scale(&self, _a: &DenseTensor<ElT>, _alpha: ElT) -> Result<DenseTensor<ElT>> {
        Err(TensorError::unsupported(self.name(), "scale"))
    }

    fn transpose(&self, _matrix: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        Err(TensorError::unsupported(self.name(), "transpose"))
    }

    /// Inner product of two rank-1 tensors of equal length.
    fn dot(&self, _a: &DenseTensor<ElT>, _b: &DenseTensor<ElT>) -> Result<ElT> {
        Err(TensorError::unsupported(self.name(), "dot"))
    }

    /// Frobenius norm.
    fn norm(&self, _a: &DenseTensor<ElT>) -> Result<f64> {
        Err(TensorError::unsupported(self.name(), "norm"))
    }

    /// # Errors
    ///
    /// `RankMismatch`, `NotSquare`, or `Singular`.
    fn inverse(&self, _matrix: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        Err(TensorError::unsupported(self.name(), "inverse"))
    }

    /// # Errors
    ///
    /// `RankMismatch` or `NotSquare`. A singular matrix yields zero.
    fn determinant(&self, _matrix: &DenseTensor<ElT>) -> Result<ElT> {
        Err(TensorError::unsupported(self.name(), "determinant"))
    }
}

/// Open a context on `provider`, run `f` in it, and release it.
///
/// The context is released whether or not `f` succeeds.
pub fn run_in_context<P, R, F>(provider: &P, f: F) -> Result<R>
where
    P: Provider + ?Sized,
    F: FnOnce(&ExecutionContext) -> Result<R>,
{
    let mut ctx = provider.create_context()?;
    let result = f(&ctx);
    ctx.release()?;
    result
}
