//! LU factorization with partial pivoting, determinant and inverse.
//!
//! An `n x n` matrix is treated as singular when some pivot of `PA = LU` is
//! small against the largest entry:
//!
//! ```text
//! min_i |U_ii| <= eps * n * max_ij |m_ij|
//! ```
//!
//! Both sides scale linearly with the matrix, and unlike `|det|` the pivots
//! do not shrink geometrically with `n` for well-conditioned input.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Packed `PA = LU` factors of a square matrix.
///
/// `L` is unit lower triangular and shares storage with `U`, row-major.
#[derive(Debug, Clone)]
pub struct LuFactors<ElT: Scalar> {
    n: usize,
    lu: Vec<ElT>,
    /// `perm[i]` is the source row of row `i` of `PA`.
    perm: Vec<usize>,
    odd_swaps: bool,
}

impl<ElT: Scalar> LuFactors<ElT> {
    /// Factor a square matrix.
    ///
    /// # Errors
    ///
    /// `RankMismatch` unless rank-2, `NotSquare` unless square. Exactly
    /// singular input is not an error here; see [`LuFactors::determinant`].
    pub fn factor(matrix: &DenseTensor<ElT>) -> Result<Self, TensorError> {
        let n = matrix.square_order()?;
        let mut lu = matrix.to_vec();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut odd_swaps = false;

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&r1, &r2| {
                    lu[r1 * n + col]
                        .modulus()
                        .total_cmp(&lu[r2 * n + col].modulus())
                })
                .unwrap_or(col);

            if pivot_row != col {
                for j in 0..n {
                    lu.swap(col * n + j, pivot_row * n + j);
                }
                perm.swap(col, pivot_row);
                odd_swaps = !odd_swaps;
            }

            let pivot = lu[col * n + col];
            if pivot == ElT::zero() {
                continue;
            }
            for row in col + 1..n {
                let factor = lu[row * n + col] / pivot;
                lu[row * n + col] = factor;
                for j in col + 1..n {
                    lu[row * n + j] = lu[row * n + j] - factor * lu[col * n + j];
                }
            }
        }

        Ok(Self {
            n,
            lu,
            perm,
            odd_swaps,
        })
    }

    /// Matrix order.
    pub fn order(&self) -> usize {
        self.n
    }

    /// Determinant: signed product of the pivots. The empty matrix has
    /// determinant one.
    pub fn determinant(&self) -> ElT {
        let diag = (0..self.n).fold(ElT::one(), |acc, i| acc * self.lu[i * self.n + i]);
        if self.odd_swaps { -diag } else { diag }
    }

    /// Solve `M x = e_j` for the `j`-th unit vector.
    ///
    /// Only meaningful once the matrix is known to be non-singular.
    pub fn solve_unit(&self, j: usize) -> Vec<ElT> {
        let n = self.n;
        let mut x: Vec<ElT> = self
            .perm
            .iter()
            .map(|&src| if src == j { ElT::one() } else { ElT::zero() })
            .collect();

        // Forward substitution with unit-diagonal L.
        for i in 0..n {
            let mut sum = x[i];
            for p in 0..i {
                sum = sum - self.lu[i * n + p] * x[p];
            }
            x[i] = sum;
        }
        // Back substitution with U.
        for i in (0..n).rev() {
            let mut sum = x[i];
            for p in i + 1..n {
                sum = sum - self.lu[i * n + p] * x[p];
            }
            x[i] = sum / self.lu[i * n + i];
        }
        x
    }

    /// Moduli of the diagonal of `U`.
    pub fn pivots(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.n).map(|i| self.lu[i * self.n + i].modulus())
    }

    /// Fail with `Singular` if a pivot lies within `tolerance` of zero.
    /// Returns the smallest pivot modulus otherwise.
    pub fn check_invertible(&self, tolerance: f64) -> Result<f64, TensorError> {
        check_pivots(self.pivots(), tolerance)
    }

    /// Assemble an inverse from solved columns (`columns[j]` is column `j`).
    pub(crate) fn assemble_inverse(n: usize, columns: Vec<Vec<ElT>>) -> DenseTensor<ElT> {
        DenseTensor::from_fn(&[n, n], |idx| columns[idx[1]][idx[0]])
    }
}

/// Absolute pivot tolerance for `matrix` given the relative `epsilon`:
/// `epsilon * n * max |m_ij|`.
pub fn singular_tolerance<ElT: Scalar>(matrix: &DenseTensor<ElT>, epsilon: f64) -> f64 {
    let n = matrix.shape().first().copied().unwrap_or(0);
    let largest = matrix
        .data()
        .iter()
        .map(|x| x.modulus())
        .fold(0.0, f64::max);
    epsilon * n as f64 * largest
}

/// Smallest of `pivots`, or `Singular` if it is NaN or at most `tolerance`.
/// No pivots at all (the empty matrix) pass with `f64::INFINITY`.
pub fn check_pivots<I>(pivots: I, tolerance: f64) -> Result<f64, TensorError>
where
    I: IntoIterator<Item = f64>,
{
    // NaN sticks once seen.
    let smallest = pivots.into_iter().fold(f64::INFINITY, |acc, p| {
        if acc.is_nan() || p >= acc { acc } else { p }
    });
    if smallest.is_nan() || smallest <= tolerance {
        return Err(TensorError::Singular {
            pivot: smallest,
            tolerance,
        });
    }
    Ok(smallest)
}

/// Pass `inverse` through unless an element overflowed to a non-finite
/// value, which is reported as `Singular` at the smallest `pivot`.
pub fn require_finite<ElT: Scalar>(
    inverse: DenseTensor<ElT>,
    pivot: f64,
    tolerance: f64,
) -> Result<DenseTensor<ElT>, TensorError> {
    if inverse.data().iter().all(|x| x.modulus().is_finite()) {
        Ok(inverse)
    } else {
        Err(TensorError::Singular { pivot, tolerance })
    }
}

/// Whether the permutation `forward` (image of each index) is odd.
pub fn permutation_is_odd(forward: &[usize]) -> bool {
    let mut visited = vec![false; forward.len()];
    let mut transpositions = 0;
    for start in 0..forward.len() {
        let mut len: usize = 0;
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            i = forward[i];
            len += 1;
        }
        transpositions += len.saturating_sub(1);
    }
    transpositions % 2 == 1
}

/// Determinant of a square matrix.
///
/// ```
/// use ndcompute::Tensor;
/// use ndcompute::operations::determinant;
///
/// let m = Tensor::from_vec(vec![1.0, 0.0, 0.0, 1.0], &[2, 2]).unwrap();
/// assert_eq!(determinant(&m).unwrap(), 1.0);
/// ```
pub fn determinant<ElT: Scalar>(matrix: &DenseTensor<ElT>) -> Result<ElT, TensorError> {
    Ok(LuFactors::factor(matrix)?.determinant())
}

/// Inverse of a square matrix, sequentially.
///
/// # Errors
///
/// `RankMismatch`, `NotSquare`, or `Singular` when a pivot is within
/// `epsilon` (relative, see [`singular_tolerance`]) of zero.
pub fn inverse<ElT: Scalar>(
    matrix: &DenseTensor<ElT>,
    epsilon: f64,
) -> Result<DenseTensor<ElT>, TensorError> {
    let lu = LuFactors::factor(matrix)?;
    let tolerance = singular_tolerance(matrix, epsilon);
    let pivot = lu.check_invertible(tolerance)?;
    let n = lu.order();
    let columns = (0..n).map(|j| lu.solve_unit(j)).collect();
    require_finite(LuFactors::assemble_inverse(n, columns), pivot, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::matmul;
    use crate::scalar::c64;
    use approx::assert_relative_eq;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_determinant_2x2() {
        let m = DenseTensor::from_vec(vec![4.0, 3.0, 6.0, 3.0], &[2, 2]).unwrap();
        assert_relative_eq!(determinant(&m).unwrap(), -6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_determinant_needs_pivoting() {
        // Zero in the leading position forces a row swap.
        let m = DenseTensor::from_vec(vec![0.0, 1.0, 1.0, 0.0], &[2, 2]).unwrap();
        assert_relative_eq!(determinant(&m).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_determinant_of_singular_is_zero() {
        let m = DenseTensor::from_vec(vec![1.0, 2.0, 2.0, 4.0], &[2, 2]).unwrap();
        assert_eq!(determinant(&m).unwrap(), 0.0);
    }

    #[test]
    fn test_determinant_errors() {
        let v: DenseTensor<f64> = DenseTensor::zeros(&[4]);
        assert!(matches!(
            determinant(&v),
            Err(TensorError::RankMismatch { expected: 2, actual: 1 })
        ));
        let r: DenseTensor<f64> = DenseTensor::zeros(&[2, 3]);
        assert!(matches!(
            determinant(&r),
            Err(TensorError::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_inverse_3x3() {
        let m =
            DenseTensor::from_vec(vec![2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0], &[3, 3])
                .unwrap();
        let inv = inverse(&m, EPS).unwrap();
        let id = matmul(&inv, &m).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*id.get(&[i, j]).unwrap(), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_inverse_c64() {
        // [[i, 0], [0, 2]]^-1 = [[-i, 0], [0, 0.5]]
        let m = DenseTensor::from_vec(
            vec![c64::new(0.0, 1.0), c64::zero(), c64::zero(), c64::new(2.0, 0.0)],
            &[2, 2],
        )
        .unwrap();
        let inv = inverse(&m, EPS).unwrap();
        assert_relative_eq!(inv.data()[0].im, -1.0, epsilon = 1e-14);
        assert_relative_eq!(inv.data()[3].re, 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_inverse_singular() {
        let m = DenseTensor::from_vec(vec![1.0, 2.0, 2.0, 4.0], &[2, 2]).unwrap();
        assert!(matches!(inverse(&m, EPS), Err(TensorError::Singular { .. })));

        let z: DenseTensor<f64> = DenseTensor::zeros(&[3, 3]);
        assert!(matches!(inverse(&z, EPS), Err(TensorError::Singular { .. })));
    }

    #[test]
    fn test_tolerance_is_relative() {
        // A tiny but well-conditioned matrix is invertible, while a huge one
        // with dependent rows is not.
        let small = DenseTensor::from_vec(vec![1e-8, 0.0, 0.0, 1e-8], &[2, 2]).unwrap();
        assert!(inverse(&small, EPS).is_ok());

        let big =
            DenseTensor::from_vec(vec![1e8, 2e8, 1e8, 2e8 + 1e-5], &[2, 2]).unwrap();
        assert!(matches!(inverse(&big, EPS), Err(TensorError::Singular { .. })));
    }

    #[test]
    fn test_tolerance_does_not_shrink_with_order() {
        // 1 on the diagonal, 0.9 elsewhere: condition number about 55, while
        // |det| is around 1e-58.
        let n = 60;
        let m = DenseTensor::from_fn(&[n, n], |i| if i[0] == i[1] { 1.0 } else { 0.9 });
        let inv = inverse(&m, EPS).unwrap();
        let id = matmul(&inv, &m).unwrap();
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*id.get(&[i, j]).unwrap(), expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_non_finite_input_is_singular() {
        let m = DenseTensor::from_vec(vec![f64::NAN, 1.0, 1.0, 1.0], &[2, 2]).unwrap();
        assert!(matches!(inverse(&m, EPS), Err(TensorError::Singular { .. })));
    }

    #[test]
    fn test_check_pivots() {
        assert_eq!(check_pivots([3.0, 0.5, 2.0], 0.1).unwrap(), 0.5);
        assert!(check_pivots([3.0, 0.05], 0.1).is_err());
        assert!(check_pivots([f64::NAN, 3.0], 0.1).is_err());
        assert!(check_pivots([3.0, f64::NAN], 0.1).is_err());
        assert_eq!(check_pivots(std::iter::empty(), 0.0).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_require_finite() {
        let bad = DenseTensor::from_vec(vec![1.0, f64::INFINITY], &[2]).unwrap();
        assert!(matches!(
            require_finite(bad, 1e-300, 0.0),
            Err(TensorError::Singular { .. })
        ));
        let good = DenseTensor::from_vec(vec![1.0, -2.0], &[2]).unwrap();
        assert!(require_finite(good, 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_permutation_parity() {
        assert!(!permutation_is_odd(&[]));
        assert!(!permutation_is_odd(&[0, 1, 2]));
        assert!(permutation_is_odd(&[1, 0, 2]));
        // A 3-cycle is two transpositions.
        assert!(!permutation_is_odd(&[1, 2, 0]));
        // 4-cycle plus a fixed point.
        assert!(permutation_is_odd(&[3, 2, 0, 1, 4]));
    }

    #[test]
    fn test_empty_matrix() {
        let e: DenseTensor<f64> = DenseTensor::zeros(&[0, 0]);
        assert_eq!(determinant(&e).unwrap(), 1.0);
        assert_eq!(inverse(&e, EPS).unwrap().len(), 0);
    }
}
