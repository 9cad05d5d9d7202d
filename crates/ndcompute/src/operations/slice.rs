//! Strided copies: slicing and broadcasting.
//!
//! ```text
//! gather(src, shape, strides, offset)
//!     → walk the output in row-major order
//!     → read src at offset + sum_i index[i] * strides[i]
//! ```
//!
//! A slice keeps the source strides and starts at an offset; a broadcast
//! uses stride 0 on every repeated axis. Both copy, so the result owns its
//! storage like every other tensor.

use std::ops::Range;

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::strides::checked_element_count;
use crate::tensor::DenseTensor;

/// Copy `src` through a strided view of `shape`.
///
/// Every index of `shape` must map into `src`; callers validate this.
pub(crate) fn gather<ElT: Scalar>(
    src: &[ElT],
    shape: &[usize],
    strides: &[usize],
    mut offset: usize,
) -> Result<DenseTensor<ElT>, TensorError> {
    let len = checked_element_count(shape).ok_or(TensorError::ShapeMismatch {
        expected: usize::MAX,
        actual: src.len(),
    })?;
    let mut index = vec![0usize; shape.len()];
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        data.push(src[offset]);
        // Odometer step, last axis fastest.
        for axis in (0..shape.len()).rev() {
            index[axis] += 1;
            offset += strides[axis];
            if index[axis] < shape[axis] {
                break;
            }
            offset -= strides[axis] * shape[axis];
            index[axis] = 0;
        }
    }
    DenseTensor::from_vec(data, shape)
}

/// Copy the block of `tensor` covered by one range per axis.
///
/// # Errors
///
/// `WrongNumberOfIndices` unless there is one range per axis,
/// `SliceOutOfBounds` for a reversed range or one past the axis extent.
///
/// ```
/// use ndcompute::DenseTensor;
/// use ndcompute::operations::slice;
///
/// let t = DenseTensor::from_fn(&[4, 5], |i| (10 * i[0] + i[1]) as f64);
/// let s = slice(&t, &[1..3, 2..4]).unwrap();
/// assert_eq!(s.shape(), &[2, 2]);
/// assert_eq!(s.data(), &[12.0, 13.0, 22.0, 23.0]);
/// ```
pub fn slice<ElT: Scalar>(
    tensor: &DenseTensor<ElT>,
    ranges: &[Range<usize>],
) -> Result<DenseTensor<ElT>, TensorError> {
    if ranges.len() != tensor.ndim() {
        return Err(TensorError::WrongNumberOfIndices {
            expected: tensor.ndim(),
            actual: ranges.len(),
        });
    }
    let mut shape = Vec::with_capacity(ranges.len());
    let mut offset = 0;
    for (dim, (range, (&size, &stride))) in ranges
        .iter()
        .zip(tensor.shape().iter().zip(tensor.strides()))
        .enumerate()
    {
        if range.start > range.end || range.end > size {
            return Err(TensorError::SliceOutOfBounds {
                start: range.start,
                end: range.end,
                dim,
                size,
            });
        }
        shape.push(range.len());
        if !range.is_empty() {
            offset += range.start * stride;
        }
    }
    gather(tensor.data(), &shape, tensor.strides(), offset)
}

/// Repeat `tensor` to fill `shape`.
///
/// Axes are matched from the right. A source axis must equal the target
/// extent or be 1; target axes beyond the source rank are new leading axes.
///
/// # Errors
///
/// `BroadcastMismatch` when the shapes are incompatible or `shape` has a
/// lower rank than `tensor`.
///
/// ```
/// use ndcompute::DenseTensor;
/// use ndcompute::operations::broadcast;
///
/// let row = DenseTensor::from_vec(vec![1.0, 2.0, 3.0], &[1, 3]).unwrap();
/// let b = broadcast(&row, &[2, 3]).unwrap();
/// assert_eq!(b.data(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
/// ```
pub fn broadcast<ElT: Scalar>(
    tensor: &DenseTensor<ElT>,
    shape: &[usize],
) -> Result<DenseTensor<ElT>, TensorError> {
    let mismatch = || TensorError::BroadcastMismatch {
        from: tensor.shape().to_vec(),
        to: shape.to_vec(),
    };
    let lead = shape.len().checked_sub(tensor.ndim()).ok_or_else(mismatch)?;

    let mut strides = vec![0usize; shape.len()];
    for (axis, (&from, &stride)) in tensor.shape().iter().zip(tensor.strides()).enumerate() {
        let to = shape[lead + axis];
        if from == to {
            strides[lead + axis] = stride;
        } else if from != 1 {
            return Err(mismatch());
        }
    }
    gather(tensor.data(), shape, &strides, 0)
}
