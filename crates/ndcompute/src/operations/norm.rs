//! Frobenius norm.

use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// `sqrt(sum |t_i|²)` over every element, as `f64` for real and complex
/// tensors alike.
///
/// ```
/// use ndcompute::DenseTensor;
/// use ndcompute::operations::norm;
///
/// let t = DenseTensor::from_vec(vec![3.0, 0.0, 4.0], &[3]).unwrap();
/// assert_eq!(norm(&t), 5.0);
/// ```
pub fn norm<ElT: Scalar>(tensor: &DenseTensor<ElT>) -> f64 {
    norm_sqr(tensor).sqrt()
}

pub fn norm_sqr<ElT: Scalar>(tensor: &DenseTensor<ElT>) -> f64 {
    slice_norm_sqr(tensor.data())
}

/// Partial sum used by the chunked parallel reduction.
pub(crate) fn slice_norm_sqr<ElT: Scalar>(data: &[ElT]) -> f64 {
    data.iter().map(|&x| x.modulus().powi(2)).sum()
}
