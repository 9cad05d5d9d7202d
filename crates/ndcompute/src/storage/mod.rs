//! Element storage behind [`crate::Tensor`].
//!
//! ```text
//! TensorStorage<T>
//! └── Dense<T>       row-major Vec, every element present
//!
//! Coordinate<T>      non-zeros keyed by linear index, behind SparseTensor
//! ```
//!
//! `Coordinate` has no dense slice to hand out, so it stands outside
//! [`TensorStorage`]. Shape and strides always live on the tensor, never in
//! the storage.

mod coordinate;
mod dense;

use crate::scalar::Scalar;

pub use coordinate::Coordinate;
pub use dense::Dense;

/// Flat element buffer owned by a tensor.
pub trait TensorStorage<T: Scalar>: Clone + std::fmt::Debug {
    /// `len` zeros.
    fn zeros(len: usize) -> Self;

    fn from_vec(data: Vec<T>) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];

    fn into_vec(self) -> Vec<T>;
}
