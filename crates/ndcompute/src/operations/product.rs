//! Vector and matrix products.
//!
//! `multiply` picks the product from the operand ranks:
//!
//! ```text
//! [m, k] · [k, n]  → matrix product      [m, n]
//! [m, k] · [k]     → matrix-vector       [m]
//! otherwise        → element-wise product (equal shapes)
//! ```

use crate::error::TensorError;
use crate::operations::elementwise::hadamard;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Which product `multiply` computes for a pair of operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    /// rank-2 · rank-2
    Matrix,
    /// rank-2 · rank-1
    MatrixVector,
    /// Any other rank combination.
    Elementwise,
}

impl ProductKind {
    /// Classify a pair of operands by rank.
    pub fn of<ElT: Scalar>(a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Self {
        match (a.ndim(), b.ndim()) {
            (2, 2) => ProductKind::Matrix,
            (2, 1) => ProductKind::MatrixVector,
            _ => ProductKind::Elementwise,
        }
    }
}

/// Check inner dimensions and return the `(m, k, n)` of a matrix product.
pub(crate) fn matmul_dims<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    b: &DenseTensor<ElT>,
) -> Result<(usize, usize, usize), TensorError> {
    let (m, k) = a.matrix_dims()?;
    let (k2, n) = b.matrix_dims()?;
    if k != k2 {
        return Err(TensorError::ShapeMismatch {
            expected: k,
            actual: k2,
        });
    }
    Ok((m, k, n))
}

/// Check inner dimensions and return the `(m, k)` of a matrix-vector product.
pub(crate) fn matvec_dims<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    v: &DenseTensor<ElT>,
) -> Result<(usize, usize), TensorError> {
    let (m, k) = a.matrix_dims()?;
    v.require_rank(1)?;
    if v.len() != k {
        return Err(TensorError::ShapeMismatch {
            expected: k,
            actual: v.len(),
        });
    }
    Ok((m, k))
}

/// Dense matrix product with triple loops.
///
/// # Example
///
/// ```
/// use ndcompute::Tensor;
/// use ndcompute::operations::matmul;
///
/// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// let b = Tensor::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
/// let c = matmul(&a, &b).unwrap();
/// assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn matmul<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    b: &DenseTensor<ElT>,
) -> Result<DenseTensor<ElT>, TensorError> {
    let (m, k, n) = matmul_dims(a, b)?;
    let (ad, bd) = (a.data(), b.data());
    let mut c = DenseTensor::zeros(&[m, n]);
    let cd = c.data_mut();
    for i in 0..m {
        for p in 0..k {
            let aip = ad[i * k + p];
            for j in 0..n {
                cd[i * n + j] = cd[i * n + j] + aip * bd[p * n + j];
            }
        }
    }
    Ok(c)
}

/// Matrix-vector product.
pub fn matvec<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    v: &DenseTensor<ElT>,
) -> Result<DenseTensor<ElT>, TensorError> {
    let (m, k) = matvec_dims(a, v)?;
    let ad = a.data();
    let mut out = DenseTensor::zeros(&[m]);
    for (i, o) in out.data_mut().iter_mut().enumerate() {
        *o = dot_slices(&ad[i * k..(i + 1) * k], v.data());
    }
    Ok(out)
}

/// Rank-dispatched product; see the module documentation.
pub fn multiply<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    b: &DenseTensor<ElT>,
) -> Result<DenseTensor<ElT>, TensorError> {
    match ProductKind::of(a, b) {
        ProductKind::Matrix => matmul(a, b),
        ProductKind::MatrixVector => matvec(a, b),
        ProductKind::Elementwise => hadamard(a, b),
    }
}

/// Check both operands are vectors of equal length.
pub(crate) fn dot_dims<ElT: Scalar>(
    a: &DenseTensor<ElT>,
    b: &DenseTensor<ElT>,
) -> Result<usize, TensorError> {
    a.require_rank(1)?;
    b.require_rank(1)?;
    if a.len() != b.len() {
        return Err(TensorError::ShapeMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.len())
}

/// Inner product of two vectors, `sum_i a_i * b_i` (no conjugation).
///
/// # Example
///
/// ```
/// use ndcompute::Tensor;
/// use ndcompute::operations::dot;
///
/// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
/// let b = Tensor::from_vec(vec![4.0, 5.0, 6.0], &[3]).unwrap();
/// assert_eq!(dot(&a, &b).unwrap(), 32.0);
/// ```
pub fn dot<ElT: Scalar>(a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<ElT, TensorError> {
    dot_dims(a, b)?;
    Ok(dot_slices(a.data(), b.data()))
}

pub(crate) fn dot_slices<ElT: Scalar>(a: &[ElT], b: &[ElT]) -> ElT {
    a.iter()
        .zip(b)
        .fold(ElT::zero(), |acc, (&x, &y)| acc + x * y)
}
