//! Sums over all elements or along one axis.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Sum of every element; zero for an empty tensor.
///
/// ```
/// use ndcompute::DenseTensor;
/// use ndcompute::operations::sum;
///
/// let t = DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// assert_eq!(sum(&t), 10.0);
/// ```
pub fn sum<ElT: Scalar>(tensor: &DenseTensor<ElT>) -> ElT {
    tensor.data().iter().fold(ElT::zero(), |acc, &x| acc + x)
}

/// Sum along `axis`, dropping it from the shape. A rank-1 input gives a
/// rank-0 tensor.
///
/// # Errors
///
/// `InvalidAxis` if `axis >= ndim`.
///
/// ```
/// use ndcompute::DenseTensor;
/// use ndcompute::operations::sum_axis;
///
/// let t = DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
/// assert_eq!(sum_axis(&t, 0).unwrap().data(), &[5.0, 7.0, 9.0]);
/// assert_eq!(sum_axis(&t, 1).unwrap().data(), &[6.0, 15.0]);
/// ```
pub fn sum_axis<ElT: Scalar>(
    tensor: &DenseTensor<ElT>,
    axis: usize,
) -> Result<DenseTensor<ElT>, TensorError> {
    let shape = tensor.shape();
    if axis >= shape.len() {
        return Err(TensorError::InvalidAxis {
            axis,
            ndim: shape.len(),
        });
    }
    let extent = shape[axis];
    let inner = tensor.strides()[axis];
    let mut reduced = shape.to_vec();
    reduced.remove(axis);

    // View the data as [outer, extent, inner] and add the middle axis away.
    let mut out = DenseTensor::zeros(&reduced);
    if extent > 0 && inner > 0 {
        for (block, dst) in tensor
            .data()
            .chunks(extent * inner)
            .zip(out.data_mut().chunks_mut(inner))
        {
            for row in block.chunks(inner) {
                for (d, &x) in dst.iter_mut().zip(row) {
                    *d = *d + x;
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::c64;

    #[test]
    fn test_sum_all() {
        let t: DenseTensor<f64> = DenseTensor::from_fn(&[3, 4], |i| (i[0] * 4 + i[1]) as f64);
        assert_eq!(sum(&t), 66.0);
        assert_eq!(sum(&DenseTensor::<f64>::zeros(&[0, 5])), 0.0);
        assert_eq!(sum(&DenseTensor::full(&[], 2.5)), 2.5);

        let z = DenseTensor::from_vec(vec![c64::new(1.0, 2.0), c64::new(-3.0, 0.5)], &[2]).unwrap();
        assert_eq!(sum(&z), c64::new(-2.0, 2.5));
    }

    #[test]
    fn test_sum_axis_matches_loops() {
        let t: DenseTensor<f64> =
            DenseTensor::from_fn(&[2, 3, 4], |i| (100 * i[0] + 10 * i[1] + i[2]) as f64);
        for axis in 0..3 {
            let s = sum_axis(&t, axis).unwrap();
            let mut expected_shape = t.shape().to_vec();
            expected_shape.remove(axis);
            assert_eq!(s.shape(), expected_shape.as_slice());

            let expected = DenseTensor::<f64>::from_fn(&expected_shape, |r| {
                (0..t.shape()[axis])
                    .map(|k| {
                        let mut idx = r.to_vec();
                        idx.insert(axis, k);
                        *t.get(&idx).unwrap()
                    })
                    .sum()
            });
            assert_eq!(s, expected);
        }
    }

    #[test]
    fn test_sum_axis_to_scalar_and_empty() {
        let v = DenseTensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let s = sum_axis(&v, 0).unwrap();
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.data(), &[6.0]);

        // Summing over an empty axis gives zeros.
        let e: DenseTensor<f64> = DenseTensor::zeros(&[2, 0, 3]);
        assert_eq!(sum_axis(&e, 1).unwrap().data(), &[0.0; 6]);
        assert!(sum_axis(&e, 0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_axis() {
        let t: DenseTensor<f64> = DenseTensor::zeros(&[2, 3]);
        assert!(matches!(
            sum_axis(&t, 2),
            Err(TensorError::InvalidAxis { axis: 2, ndim: 2 })
        ));
        assert!(sum_axis(&DenseTensor::<f64>::full(&[], 1.0), 0).is_err());
    }
}
