//! GPU/sparse provider.
//!
//! Advertises construction and GPU capabilities. No device kernels are
//! implemented: construction runs on the host once a device is present, and
//! every arithmetic or linear-algebra kernel reports
//! [`TensorError::UnsupportedOperation`].

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::backend::{
    BackendProvider, Capabilities, ContextResources, ContextTracker, ExecutionContext, Provider,
    run_in_context,
};
use crate::error::{Result, TensorError};
use crate::scalar::Scalar;
use crate::sparse::SparseTensor;

/// Live device check. Called on every availability query.
pub type DeviceProbe = Arc<dyn Fn() -> bool + Send + Sync>;

/// Provider for an accelerator device with sparse tensor construction.
pub struct GpuSparseBackend {
    probe: DeviceProbe,
    device_id: usize,
    tracker: Arc<ContextTracker>,
}

impl GpuSparseBackend {
    pub const NAME: &'static str = "gpu-sparse";

    /// Provider without a device; never available.
    pub fn new() -> Self {
        Self::with_probe(0, Arc::new(|| false))
    }

    /// Provider for `device_id`, available whenever `probe` returns true.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use ndcompute::backend::{GpuSparseBackend, Provider};
    ///
    /// let gpu = GpuSparseBackend::with_probe(0, Arc::new(|| true));
    /// assert!(gpu.is_available());
    /// assert!(!GpuSparseBackend::new().is_available());
    /// ```
    pub fn with_probe(device_id: usize, probe: DeviceProbe) -> Self {
        debug!("constructing {} provider for device {}", Self::NAME, device_id);
        Self {
            probe,
            device_id,
            tracker: ContextTracker::new(),
        }
    }

    pub fn device_id(&self) -> usize {
        self.device_id
    }

    /// Sparse tensor from row-major `data`, keeping only non-zero entries.
    ///
    /// # Errors
    ///
    /// `BackendUnavailable` without a device, `ShapeMismatch` if the data
    /// length doesn't match the shape.
    pub fn create_sparse<ElT: Scalar>(
        &self,
        data: Vec<ElT>,
        shape: &[usize],
    ) -> Result<SparseTensor<ElT>> {
        run_in_context(self, |_| SparseTensor::from_vec(data, shape))
    }
}

impl Default for GpuSparseBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GpuSparseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuSparseBackend")
            .field("device_id", &self.device_id)
            .field("active_contexts", &self.tracker.active())
            .finish_non_exhaustive()
    }
}

impl Provider for GpuSparseBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::TENSOR_CONSTRUCTION | Capabilities::GPU
    }

    fn is_available(&self) -> bool {
        (self.probe)()
    }

    fn create_context(&self) -> Result<ExecutionContext> {
        if !self.is_available() {
            debug!("{}: device {} not present", Self::NAME, self.device_id);
            return Err(TensorError::BackendUnavailable {
                backend: Self::NAME.to_string(),
            });
        }
        Ok(ExecutionContext::open(
            Self::NAME,
            ContextResources::Device {
                device_id: self.device_id,
            },
            &self.tracker,
        ))
    }

    fn active_contexts(&self) -> usize {
        self.tracker.active()
    }
}

impl<ElT: Scalar> BackendProvider<ElT> for GpuSparseBackend {}
