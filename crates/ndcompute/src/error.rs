//! Error types for ndcompute.

use thiserror::Error;

use crate::backend::Capabilities;
use crate::config::ConfigError;

/// Errors that can occur in tensor construction, kernels and backend selection.
#[derive(Debug, Error)]
pub enum TensorError {
    /// Shape mismatch between data length (or operand shapes) and expected size.
    /// A shape whose element count overflows `usize` reports `expected` as
    /// `usize::MAX`.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Operation requires specific tensor rank.
    #[error("expected tensor of rank {expected}, got rank {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// Matrix must be square.
    #[error("matrix must be square: got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Matrix has no inverse: an LU pivot is within the tolerance of zero,
    /// or the inverse would not be finite.
    #[error("matrix is singular: pivot {pivot:e} is within tolerance {tolerance:e}")]
    Singular { pivot: f64, tolerance: f64 },

    /// The provider does not implement the requested kernel.
    #[error("operation `{operation}` is not supported by backend `{backend}`")]
    UnsupportedOperation {
        backend: String,
        operation: &'static str,
    },

    /// The provider exists but cannot run right now (e.g. device absent).
    #[error("backend `{backend}` is not available")]
    BackendUnavailable { backend: String },

    /// No registered provider satisfies the requested capabilities.
    #[error("no available backend provides {required}")]
    NoBackendAvailable { required: Capabilities },

    /// Execution context was used or released after it had been released.
    #[error("execution context of backend `{backend}` was already released")]
    ContextReleased { backend: String },

    /// Index out of bounds.
    #[error("index out of bounds: index {index} is out of range for dimension {dim_size}")]
    IndexOutOfBounds { index: usize, dim_size: usize },

    /// Wrong number of indices provided.
    #[error("wrong number of indices: expected {expected}, got {actual}")]
    WrongNumberOfIndices { expected: usize, actual: usize },

    /// Slice range out of bounds.
    #[error("slice range {start}..{end} out of bounds for dimension {dim} with size {size}")]
    SliceOutOfBounds {
        start: usize,
        end: usize,
        dim: usize,
        size: usize,
    },

    /// Axis argument beyond the tensor rank.
    #[error("axis {axis} out of range for tensor with {ndim} dimensions")]
    InvalidAxis { axis: usize, ndim: usize },

    /// Shapes that cannot be broadcast onto each other.
    #[error("cannot broadcast shape {from:?} to {to:?}")]
    BroadcastMismatch { from: Vec<usize>, to: Vec<usize> },

    /// Invalid permutation.
    #[error("invalid permutation {perm:?} for tensor with {ndim} dimensions")]
    InvalidPermutation { perm: Vec<usize>, ndim: usize },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TensorError {
    /// Shorthand for [`TensorError::UnsupportedOperation`].
    pub fn unsupported(backend: &str, operation: &'static str) -> Self {
        TensorError::UnsupportedOperation {
            backend: backend.to_string(),
            operation,
        }
    }

    /// Whether the caller can recover by choosing another provider or a
    /// lesser capability set.
    pub fn is_availability_error(&self) -> bool {
        matches!(
            self,
            TensorError::BackendUnavailable { .. } | TensorError::NoBackendAvailable { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TensorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TensorError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(err.to_string(), "matrix must be square: got 2x3");

        let err = TensorError::unsupported("gpu-sparse", "add");
        assert!(err.to_string().contains("`add`"));
        assert!(err.to_string().contains("gpu-sparse"));

        let err = TensorError::Singular {
            pivot: 0.0,
            tolerance: 1e-12,
        };
        assert_eq!(
            err.to_string(),
            "matrix is singular: pivot 0e0 is within tolerance 1e-12"
        );
    }

    #[test]
    fn test_availability_errors() {
        assert!(
            TensorError::BackendUnavailable {
                backend: "gpu".into()
            }
            .is_availability_error()
        );
        assert!(
            TensorError::NoBackendAvailable {
                required: Capabilities::GPU
            }
            .is_availability_error()
        );
        assert!(!TensorError::RankMismatch { expected: 1, actual: 2 }.is_availability_error());
    }
}
