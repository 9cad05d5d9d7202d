//! Stride computation utilities.
//!
//! Uses row-major (C) order: the last index varies fastest.

/// Number of elements described by a shape, saturating at `usize::MAX`.
///
/// A rank-0 shape holds a single element. Any zero extent makes the count
/// zero, however large the other extents are.
///
/// # Examples
///
/// ```
/// use ndcompute::strides::element_count;
///
/// assert_eq!(element_count(&[2, 3]), 6);
/// assert_eq!(element_count(&[]), 1);
/// assert_eq!(element_count(&[4, 0]), 0);
/// assert_eq!(element_count(&[1 << 32, 1 << 32]), usize::MAX);
/// assert_eq!(element_count(&[1 << 32, 1 << 32, 0]), 0);
/// ```
#[inline]
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().fold(1usize, |acc, &dim| acc.saturating_mul(dim))
}

/// Element count of `shape`, or `None` when it does not fit in `usize`.
#[inline]
pub fn checked_element_count(shape: &[usize]) -> Option<usize> {
    match element_count(shape) {
        usize::MAX => None,
        count => Some(count),
    }
}

/// Compute row-major strides from shape.
///
/// For shape [d0, d1, d2], returns strides [d1*d2, d2, 1]. Strides
/// saturate rather than wrap; they only overflow for shapes with a zero
/// extent, which have no valid index to convert.
///
/// # Examples
///
/// ```
/// use ndcompute::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), Vec::<usize>::new());
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride: usize = 1;

    for (s, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = stride;
        stride = stride.saturating_mul(dim);
    }

    strides
}

/// Convert cartesian indices to linear index.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert linear index to cartesian indices using row-major order.
pub fn linear_to_cartesian(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];

    for (idx, &dim) in indices.iter_mut().zip(shape.iter()).rev() {
        *idx = linear % dim;
        linear /= dim;
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_strides_3d() {
        assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
    }

    #[test]
    fn test_compute_strides_empty() {
        assert_eq!(compute_strides(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_cartesian_to_linear() {
        let strides = compute_strides(&[3, 4, 5]);
        // index [i, j, k] -> 20*i + 5*j + k
        assert_eq!(cartesian_to_linear(&[0, 0, 0], &strides), 0);
        assert_eq!(cartesian_to_linear(&[0, 0, 1], &strides), 1);
        assert_eq!(cartesian_to_linear(&[0, 1, 0], &strides), 5);
        assert_eq!(cartesian_to_linear(&[1, 0, 0], &strides), 20);
        assert_eq!(cartesian_to_linear(&[2, 3, 4], &strides), 59);
    }

    #[test]
    fn test_linear_to_cartesian() {
        let shape = [3, 4, 5];
        assert_eq!(linear_to_cartesian(0, &shape), vec![0, 0, 0]);
        assert_eq!(linear_to_cartesian(1, &shape), vec![0, 0, 1]);
        assert_eq!(linear_to_cartesian(5, &shape), vec![0, 1, 0]);
        assert_eq!(linear_to_cartesian(59, &shape), vec![2, 3, 4]);
    }

    #[test]
    fn test_overflowing_shapes_saturate() {
        let huge = [1usize << 32, 1 << 32];
        assert_eq!(element_count(&huge), usize::MAX);
        assert_eq!(checked_element_count(&huge), None);
        assert_eq!(checked_element_count(&[3, 4]), Some(12));
        assert_eq!(checked_element_count(&[0, 1 << 40, 1 << 40]), Some(0));
        assert_eq!(compute_strides(&[0, 1 << 40, 1 << 40])[0], usize::MAX);
    }

    #[test]
    fn test_linear_cartesian_agree() {
        let shape = [3, 4, 5];
        let strides = compute_strides(&shape);
        for linear in 0..element_count(&shape) {
            let cartesian = linear_to_cartesian(linear, &shape);
            assert_eq!(cartesian_to_linear(&cartesian, &strides), linear);
        }
    }
}
