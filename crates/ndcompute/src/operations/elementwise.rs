//! Element-wise tensor operations.
//!
//! These are the sequential reference kernels: the naive provider calls them
//! directly and the multicore provider falls back to them below its
//! parallel threshold.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Apply a function to each element, returning a new tensor.
///
/// # Example
///
/// ```
/// use ndcompute::Tensor;
/// use ndcompute::operations::map;
///
/// let t = Tensor::from_vec(vec![1.0, 4.0, 9.0], &[3]).unwrap();
/// let ts = map(&t, |x: f64| x.sqrt());
/// assert_eq!(ts.data(), &[1.0, 2.0, 3.0]);
/// ```
pub fn map<ElT: Scalar, F>(tensor: &DenseTensor<ElT>, f: F) -> DenseTensor<ElT>
where
    F: Fn(ElT) -> ElT,
{
    let mut result = DenseTensor::zeros(tensor.shape());
    for (out, &x) in result.data_mut().iter_mut().zip(tensor.data()) {
        *out = f(x);
    }
    result
}

/// Combine two tensors of identical shape element by element.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if the shapes differ.
pub fn zip_with<ElT: Scalar, F>(
    a: &DenseTensor<ElT>,
    b: &DenseTensor<ElT>,
    f: F,
) -> Result<DenseTensor<ElT>, TensorError>
where
    F: Fn(ElT, ElT) -> ElT,
{
    a.require_same_shape(b)?;
    let mut result = DenseTensor::zeros(a.shape());
    for ((out, &x), &y) in result.data_mut().iter_mut().zip(a.data()).zip(b.data()) {
        *out = f(x, y);
    }
    Ok(result)
}

/// Element-wise sum.
///
/// # Example
///
/// ```
/// use ndcompute::Tensor;
/// use ndcompute::operations::add;
///
/// let a: Tensor<f64> = Tensor::zeros(&[3]);
/// let b: Tensor<f64> = Tensor::ones(&[3]);
/// assert_eq!(add(&a, &b).unwrap().data(), &[1.0, 1.0, 1.0]);
/// ```
pub fn add<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    b: &DenseTensor<ElT>,
) -> Result<DenseTensor<ElT>, TensorError> {
    zip_with(a, b, |x, y| x + y)
}

/// Element-wise difference `a - b`.
pub fn subtract<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    b: &DenseTensor<ElT>,
) -> Result<DenseTensor<ElT>, TensorError> {
    zip_with(a, b, |x, y| x - y)
}

/// Element-wise (Hadamard) product.
pub fn hadamard<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    b: &DenseTensor<ElT>,
) -> Result<DenseTensor<ElT>, TensorError> {
    zip_with(a, b, |x, y| x * y)
}

/// Multiply all elements by a scalar, returning a new tensor.
///
/// # Example
///
/// ```
/// use ndcompute::Tensor;
/// use ndcompute::operations::scale;
///
/// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
/// let ts = scale(&t, 2.0);
/// assert_eq!(ts.data(), &[2.0, 4.0, 6.0]);
/// ```
pub fn scale<ElT: Scalar>(tensor: &DenseTensor<ElT>, alpha: ElT) -> DenseTensor<ElT> {
    map(tensor, |x| x * alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::c64;

    #[test]
    fn test_add_subtract() {
        let a = DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = DenseTensor::from_vec(vec![10.0, 20.0, 30.0, 40.0], &[2, 2]).unwrap();

        let sum = add(&a, &b).unwrap();
        assert_eq!(sum.shape(), &[2, 2]);
        assert_eq!(sum.data(), &[11.0, 22.0, 33.0, 44.0]);

        let diff = subtract(&b, &a).unwrap();
        assert_eq!(diff.data(), &[9.0, 18.0, 27.0, 36.0]);
    }

    #[test]
    fn test_hadamard_c64() {
        let a = DenseTensor::from_vec(vec![c64::new(1.0, 1.0), c64::new(2.0, 0.0)], &[2]).unwrap();
        let b = DenseTensor::from_vec(vec![c64::new(1.0, -1.0), c64::new(0.0, 3.0)], &[2]).unwrap();
        let p = hadamard(&a, &b).unwrap();
        assert_eq!(p.data(), &[c64::new(2.0, 0.0), c64::new(0.0, 6.0)]);
    }

    #[test]
    fn test_shape_mismatch() {
        let a: DenseTensor<f64> = DenseTensor::zeros(&[2, 3]);
        let b: DenseTensor<f64> = DenseTensor::zeros(&[3, 2]);
        assert!(matches!(add(&a, &b), Err(TensorError::ShapeMismatch { .. })));
        assert!(hadamard(&a, &b).is_err());
    }

    #[test]
    fn test_scale_and_map_preserve_input() {
        let t = DenseTensor::from_vec(vec![1.0, -2.0], &[2]).unwrap();
        let s = scale(&t, -3.0);
        assert_eq!(s.data(), &[-3.0, 6.0]);
        assert_eq!(t.data(), &[1.0, -2.0]);

        let m = map(&t, |x: f64| x.abs());
        assert_eq!(m.data(), &[1.0, 2.0]);
    }
}
