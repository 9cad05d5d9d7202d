//! Zero-copy views of matrices as faer matrices.
//!
//! # Memory Layout
//!
//! Tensors are row-major, so a rank-2 tensor maps onto a faer matrix with
//! row stride `ncols` and column stride 1. faer kernels accept either
//! layout, so no copy is needed.

use faer::{MatMut, MatRef};

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Extension trait for viewing rank-2 tensors as faer matrices.
pub trait AsFaerMat<T: Scalar> {
    /// View a rank-2 tensor as an immutable faer matrix (zero-copy).
    ///
    /// # Errors
    ///
    /// `RankMismatch` unless the tensor is rank-2.
    ///
    /// # Example
    ///
    /// ```
    /// use ndcompute::Tensor;
    /// use ndcompute::backend::AsFaerMat;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let mat = t.as_faer_mat().unwrap();
    /// assert_eq!(mat.nrows(), 2);
    /// assert_eq!(mat[(0, 2)], 3.0);
    /// ```
    fn as_faer_mat(&self) -> Result<MatRef<'_, T>, TensorError>;
}

impl<T: Scalar> AsFaerMat<T> for DenseTensor<T> {
    fn as_faer_mat(&self) -> Result<MatRef<'_, T>, TensorError> {
        let (rows, cols) = self.matrix_dims()?;
        Ok(MatRef::from_row_major_slice(self.data(), rows, cols))
    }
}

/// Mutable row-major view of a rank-2 output tensor.
pub(crate) fn as_faer_mat_mut<T: Scalar>(
    tensor: &mut DenseTensor<T>,
) -> Result<MatMut<'_, T>, TensorError> {
    let (rows, cols) = tensor.matrix_dims()?;
    Ok(MatMut::from_row_major_slice_mut(
        tensor.data_mut(),
        rows,
        cols,
    ))
}

/// Create a DenseTensor from a faer matrix (copies data).
///
/// # Example
///
/// ```
/// use faer::Mat;
/// use ndcompute::backend::tensor_from_faer_mat;
///
/// let mat = Mat::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
/// let tensor = tensor_from_faer_mat(mat.as_ref());
/// assert_eq!(tensor.shape(), &[2, 3]);
/// assert_eq!(tensor.data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn tensor_from_faer_mat<T: Scalar>(mat: MatRef<'_, T>) -> DenseTensor<T> {
    DenseTensor::from_fn(&[mat.nrows(), mat.ncols()], |idx| mat[(idx[0], idx[1])])
}
