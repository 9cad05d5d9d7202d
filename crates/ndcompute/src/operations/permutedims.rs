//! Axis permutation.
//!
//! ```text
//! permutedims(tensor, perm)
//!     → check perm is a permutation of 0..ndim
//!     → output dim i has extent shape[perm[i]] and source stride strides[perm[i]]
//!     → walk output in row-major order, gathering through the permuted strides
//! ```

use crate::error::TensorError;
use crate::operations::slice::gather;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Reorder the axes of `tensor`: axis `i` of the result is axis `perm[i]`
/// of the input.
///
/// # Errors
///
/// `InvalidPermutation` unless `perm` holds each of `0..ndim` exactly once.
///
/// ```
/// use ndcompute::DenseTensor;
/// use ndcompute::operations::permutedims;
///
/// let t = DenseTensor::from_fn(&[2, 3, 4], |i| (100 * i[0] + 10 * i[1] + i[2]) as f64);
/// let p = permutedims(&t, &[2, 0, 1]).unwrap();
/// assert_eq!(p.shape(), &[4, 2, 3]);
/// assert_eq!(p.get(&[3, 1, 2]), Some(&123.0));
/// ```
pub fn permutedims<ElT: Scalar>(
    tensor: &DenseTensor<ElT>,
    perm: &[usize],
) -> Result<DenseTensor<ElT>, TensorError> {
    check_permutation(perm, tensor.ndim())?;

    let shape: Vec<usize> = perm.iter().map(|&p| tensor.shape()[p]).collect();
    let strides: Vec<usize> = perm.iter().map(|&p| tensor.strides()[p]).collect();
    gather(tensor.data(), &shape, &strides, 0)
}

/// Swap the two axes of a matrix.
///
/// # Errors
///
/// `RankMismatch` unless `matrix` has rank 2.
///
/// ```
/// use ndcompute::DenseTensor;
/// use ndcompute::operations::transpose;
///
/// let m = DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
/// assert_eq!(transpose(&m).unwrap().data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// ```
pub fn transpose<ElT: Scalar>(matrix: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>, TensorError> {
    matrix.require_rank(2)?;
    permutedims(matrix, &[1, 0])
}

fn check_permutation(perm: &[usize], ndim: usize) -> Result<(), TensorError> {
    let mut seen = vec![false; ndim];
    let valid = perm.len() == ndim
        && perm
            .iter()
            .all(|&p| p < ndim && !std::mem::replace(&mut seen[p], true));
    if valid {
        Ok(())
    } else {
        Err(TensorError::InvalidPermutation {
            perm: perm.to_vec(),
            ndim,
        })
    }
}
