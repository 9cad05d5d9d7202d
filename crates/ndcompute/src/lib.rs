//! ndcompute - pluggable tensor compute backends
//!
//! Tensor kernels (construction, arithmetic, products, inverse,
//! determinant) run on interchangeable providers, chosen at run time by the
//! capabilities they advertise and whether they are available.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Selection (registry module)
//!     → BackendRegistry::select(capabilities)
//!
//! Level 2: Providers (backend module)
//!     → NaiveCpuBackend      (sequential loops)
//!     → MulticoreCpuBackend  (rayon pool, faer GEMM)
//!     → GpuSparseBackend     (construction, device-gated)
//!
//! Level 3: Kernels (operations module)
//!     → elementwise, products, norm, permutedims, LU
//! ```
//!
//! The [`field`] module builds electromagnetic field tensors on top of a
//! selected provider.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ndcompute::backend::{BackendProvider, MulticoreCpuBackend, NaiveCpuBackend, Provider};
//! use ndcompute::{BackendRegistry, Capabilities, DenseTensor};
//!
//! let naive = Arc::new(NaiveCpuBackend::new());
//! let multicore = Arc::new(MulticoreCpuBackend::new().unwrap());
//! let mut registry = BackendRegistry::<f64>::new();
//! registry.register(&naive);
//! registry.register(&multicore);
//!
//! let provider = registry.select(Capabilities::LINEAR_ALGEBRA).unwrap();
//! let a = provider.create(vec![1.0, 2.0, 3.0], &[3]).unwrap();
//! let b = provider.create(vec![4.0, 5.0, 6.0], &[3]).unwrap();
//! assert_eq!(provider.dot(&a, &b).unwrap(), 32.0);
//!
//! let m: DenseTensor<f64> = DenseTensor::identity(2);
//! assert_eq!(provider.determinant(&m).unwrap(), 1.0);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod field;
pub mod operations;
pub mod random;
pub mod registry;
pub mod scalar;
pub mod sparse;
pub mod storage;
pub mod strides;
pub mod tensor;

pub use backend::{
    BackendProvider, Capabilities, ExecutionContext, GpuSparseBackend, MulticoreCpuBackend,
    NaiveCpuBackend, Provider,
};
pub use config::{ComputeConfig, ConfigError, DipoleConfig};
pub use error::{Result, TensorError};
pub use field::{FieldSource, FieldTensor, FieldTensorKernel, OscillatingDipole, SpacetimePoint};
pub use registry::BackendRegistry;
pub use scalar::{Scalar, c64};
pub use sparse::SparseTensor;
pub use storage::{Coordinate, Dense, TensorStorage};
pub use tensor::{DenseTensor, Tensor};
