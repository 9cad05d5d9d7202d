//! Sparse tensors in coordinate form.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::storage::Coordinate;
use crate::strides::{cartesian_to_linear, compute_strides, element_count};
use crate::tensor::DenseTensor;

/// Tensor storing only its non-zero entries.
///
/// Shares the shape contract of [`DenseTensor`]: row-major linear indices
/// and `len == product(shape)`.
///
/// ```
/// use ndcompute::{DenseTensor, SparseTensor};
///
/// let dense = DenseTensor::from_vec(vec![0.0, 2.0, 0.0, 0.0], &[2, 2]).unwrap();
/// let sparse = SparseTensor::from_dense(&dense);
/// assert_eq!(sparse.nnz(), 1);
/// assert_eq!(sparse.get(&[0, 1]), Some(2.0));
/// assert_eq!(sparse.to_dense(), dense);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SparseTensor<ElT: Scalar> {
    storage: Coordinate<ElT>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl<ElT: Scalar> SparseTensor<ElT> {
    /// All-zero sparse tensor.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            storage: Coordinate::zeros(element_count(shape)),
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        }
    }

    /// Sparse tensor from row-major dense data.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the data length doesn't match the shape.
    pub fn from_vec(data: Vec<ElT>, shape: &[usize]) -> Result<Self, TensorError> {
        let expected = element_count(shape);
        if data.len() != expected {
            return Err(TensorError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            storage: Coordinate::from_dense(&data),
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        })
    }

    pub fn from_dense(tensor: &DenseTensor<ElT>) -> Self {
        Self {
            storage: Coordinate::from_dense(tensor.data()),
            shape: tensor.shape().to_vec(),
            strides: tensor.strides().to_vec(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Logical element count, zeros included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.storage.nnz()
    }

    /// Element at cartesian `indices`; `None` when out of bounds.
    pub fn get(&self, indices: &[usize]) -> Option<ElT> {
        if indices.len() != self.ndim() || indices.iter().zip(&self.shape).any(|(&i, &d)| i >= d) {
            return None;
        }
        self.storage.get(cartesian_to_linear(indices, &self.strides))
    }

    /// Iterate over `(linear_index, value)` of the non-zero entries.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, ElT)> + '_ {
        self.storage.iter()
    }

    pub fn to_dense(&self) -> DenseTensor<ElT> {
        let data = self.storage.to_dense();
        DenseTensor::from_fn(&self.shape, |idx| data[cartesian_to_linear(idx, &self.strides)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let s = SparseTensor::from_vec(vec![1.0, 0.0, 0.0, 0.0, 0.0, -3.0], &[2, 3]).unwrap();
        assert_eq!(s.len(), 6);
        assert_eq!(s.nnz(), 2);
        assert_eq!(s.get(&[1, 2]), Some(-3.0));
        assert_eq!(s.get(&[1, 1]), Some(0.0));
        assert_eq!(s.get(&[2, 0]), None);
        assert_eq!(s.get(&[0]), None);
        assert_eq!(s.iter_nonzero().collect::<Vec<_>>(), vec![(0, 1.0), (5, -3.0)]);
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        assert!(matches!(
            SparseTensor::<f64>::from_vec(vec![0.0; 5], &[2, 3]),
            Err(TensorError::ShapeMismatch { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_zeros_to_dense() {
        let s: SparseTensor<f64> = SparseTensor::zeros(&[2, 2]);
        assert_eq!(s.nnz(), 0);
        assert_eq!(s.to_dense(), DenseTensor::zeros(&[2, 2]));
    }
}
