//! N-dimensional tensor type with polymorphic storage.
//!
//! ```text
//! Tensor{ElT, StoreT<:TensorStorage}
//! └── DenseTensor = Tensor where StoreT<:Dense
//! ```
//!
//! `Dense` is the only storage today; [`crate::SparseTensor`] keeps its own
//! coordinate storage outside this hierarchy.
//!
//! Tensors are immutable once constructed: every operation returns a new
//! tensor, and storage is never shared between tensors.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::storage::{Dense, TensorStorage};
use crate::strides::{
    cartesian_to_linear, checked_element_count, compute_strides, element_count,
    linear_to_cartesian,
};
use std::marker::PhantomData;
use std::ops::Range;

/// A n-dimensional tensor with polymorphic storage.
///
/// The storage type `StoreT` determines the storage layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<ElT: Scalar, StoreT: TensorStorage<ElT> = Dense<ElT>> {
    storage: StoreT,
    shape: Vec<usize>,
    strides: Vec<usize>,
    _phantom: PhantomData<ElT>,
}

/// Type alias for dense tensors (most common case).
pub type DenseTensor<ElT> = Tensor<ElT, Dense<ElT>>;

impl<ElT: Scalar, StoreT: TensorStorage<ElT>> Tensor<ElT, StoreT> {
    /// All-zero tensor of `shape`.
    ///
    /// # Panics
    ///
    /// If the element count of `shape` overflows `usize`, like
    /// `Vec::with_capacity`. [`Tensor::try_zeros`] reports it instead.
    ///
    /// ```
    /// use ndcompute::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::zeros(&[2, 3, 4]);
    /// assert_eq!(t.shape(), &[2, 3, 4]);
    /// assert_eq!(t.len(), 24);
    /// ```
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            storage: StoreT::zeros(element_count(shape)),
            shape: shape.to_vec(),
            strides: compute_strides(shape),
            _phantom: PhantomData,
        }
    }

    /// All-one tensor of `shape`.
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, ElT::one())
    }

    /// [`Tensor::zeros`] that fails with `ShapeMismatch` (expected
    /// `usize::MAX`) when the element count of `shape` overflows.
    pub fn try_zeros(shape: &[usize]) -> Result<Self, TensorError> {
        require_countable(shape)?;
        Ok(Self::zeros(shape))
    }

    /// [`Tensor::full`] that fails like [`Tensor::try_zeros`].
    pub fn try_full(shape: &[usize], value: ElT) -> Result<Self, TensorError> {
        require_countable(shape)?;
        Ok(Self::full(shape, value))
    }

    /// Tensor of `shape` with every element equal to `value`.
    pub fn full(shape: &[usize], value: ElT) -> Self {
        let data = vec![value; element_count(shape)];
        Self::from_parts(StoreT::from_vec(data), shape)
    }

    /// Wrap row-major `data` as a tensor of `shape`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when `data.len()` is not the product of `shape`,
    /// including when that product overflows.
    ///
    /// ```
    /// use ndcompute::{DenseTensor, Tensor};
    ///
    /// let t: DenseTensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(t.get(&[0, 0]), Some(&1.0));
    /// assert_eq!(t.get(&[0, 1]), Some(&2.0)); // Row-major: [0,1] is second element
    /// assert_eq!(t.get(&[1, 0]), Some(&4.0));
    /// ```
    pub fn from_vec(data: Vec<ElT>, shape: &[usize]) -> Result<Self, TensorError> {
        let expected = element_count(shape);
        if data.len() != expected {
            return Err(TensorError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(StoreT::from_vec(data), shape))
    }

    /// Tensor whose element at each cartesian index is `f(index)`.
    ///
    /// ```
    /// use ndcompute::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::from_fn(&[2, 2], |idx| (idx[0] * 10 + idx[1]) as f64);
    /// assert_eq!(t.data(), &[0.0, 1.0, 10.0, 11.0]);
    /// ```
    pub fn from_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> ElT,
    {
        let data = (0..element_count(shape))
            .map(|linear| f(&linear_to_cartesian(linear, shape)))
            .collect();
        Self::from_parts(StoreT::from_vec(data), shape)
    }

    fn from_parts(storage: StoreT, shape: &[usize]) -> Self {
        Self {
            storage,
            shape: shape.to_vec(),
            strides: compute_strides(shape),
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Rank.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Element count; 1 for a rank-0 tensor.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Row-major strides, in elements.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Elements in row-major order.
    #[inline]
    pub fn data(&self) -> &[ElT] {
        self.storage.as_slice()
    }

    /// Mutable access for kernels filling a freshly allocated output.
    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [ElT] {
        self.storage.as_mut_slice()
    }

    /// Copy the elements out in row-major order.
    pub fn to_vec(&self) -> Vec<ElT> {
        self.data().to_vec()
    }

    /// Consume the tensor and return its elements in row-major order.
    pub fn into_vec(self) -> Vec<ElT> {
        self.storage.into_vec()
    }

    #[inline]
    pub fn get_linear(&self, i: usize) -> Option<&ElT> {
        self.storage.as_slice().get(i)
    }

    /// Element at cartesian `indices`, `None` on a bad index.
    pub fn get(&self, indices: &[usize]) -> Option<&ElT> {
        self.checked_linear(indices).ok().and_then(|i| self.get_linear(i))
    }

    /// Like [`Tensor::get`], but reports why the lookup failed.
    pub fn try_get(&self, indices: &[usize]) -> Result<ElT, TensorError> {
        let linear = self.checked_linear(indices)?;
        Ok(self.storage.as_slice()[linear])
    }

    fn checked_linear(&self, indices: &[usize]) -> Result<usize, TensorError> {
        if indices.len() != self.ndim() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: self.ndim(),
                actual: indices.len(),
            });
        }
        for (&idx, &dim) in indices.iter().zip(self.shape.iter()) {
            if idx >= dim {
                return Err(TensorError::IndexOutOfBounds {
                    index: idx,
                    dim_size: dim,
                });
            }
        }
        Ok(cartesian_to_linear(indices, &self.strides))
    }

    /// Fail with `RankMismatch` unless the tensor has rank `expected`.
    pub fn require_rank(&self, expected: usize) -> Result<(), TensorError> {
        if self.ndim() != expected {
            return Err(TensorError::RankMismatch {
                expected,
                actual: self.ndim(),
            });
        }
        Ok(())
    }

    /// `(rows, cols)` of a rank-2 tensor.
    pub fn matrix_dims(&self) -> Result<(usize, usize), TensorError> {
        self.require_rank(2)?;
        Ok((self.shape[0], self.shape[1]))
    }

    /// Order `n` of a square `n x n` matrix.
    pub fn square_order(&self) -> Result<usize, TensorError> {
        let (rows, cols) = self.matrix_dims()?;
        if rows != cols {
            return Err(TensorError::NotSquare { rows, cols });
        }
        Ok(rows)
    }

    /// Fail with `ShapeMismatch` unless `other` has exactly the same shape.
    pub fn require_same_shape<S: TensorStorage<ElT>>(
        &self,
        other: &Tensor<ElT, S>,
    ) -> Result<(), TensorError> {
        if self.shape() != other.shape() {
            return Err(TensorError::ShapeMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }
}

impl<ElT: Scalar> Tensor<ElT, Dense<ElT>> {
    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(&[n, n], |idx| {
            if idx[0] == idx[1] {
                ElT::one()
            } else {
                ElT::zero()
            }
        })
    }

    /// Same elements in row-major order under `new_shape`. Copies.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when the element counts differ.
    ///
    /// ```
    /// use ndcompute::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let t3x2 = t.reshape(&[3, 2]).unwrap();
    /// assert_eq!(t3x2.shape(), &[3, 2]);
    /// assert_eq!(t3x2.data(), t.data());
    /// ```
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Self, TensorError> {
        let new_len = element_count(new_shape);
        if self.len() != new_len {
            return Err(TensorError::ShapeMismatch {
                expected: self.len(),
                actual: new_len,
            });
        }
        Self::from_vec(self.to_vec(), new_shape)
    }

    /// See [`crate::operations::permutedims`].
    ///
    /// ```
    /// use ndcompute::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let t2 = t.permutedims(&[1, 0]).unwrap();
    /// assert_eq!(t2.shape(), &[3, 2]);
    /// assert_eq!(t.get(&[0, 2]), t2.get(&[2, 0]));
    /// ```
    pub fn permutedims(&self, perm: &[usize]) -> Result<Self, TensorError> {
        crate::operations::permutedims(self, perm)
    }

    /// Sum of every element. See [`crate::operations::sum`].
    pub fn sum(&self) -> ElT {
        crate::operations::sum(self)
    }

    /// See [`crate::operations::sum_axis`].
    ///
    /// ```
    /// use ndcompute::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(t.sum_axis(1).unwrap().data(), &[6.0, 15.0]);
    /// assert_eq!(t.sum(), 21.0);
    /// ```
    pub fn sum_axis(&self, axis: usize) -> Result<Self, TensorError> {
        crate::operations::sum_axis(self, axis)
    }

    /// Copy repeated onto `shape`. See [`crate::operations::broadcast`].
    pub fn broadcast(&self, shape: &[usize]) -> Result<Self, TensorError> {
        crate::operations::broadcast(self, shape)
    }

    /// Copy of one block. See [`crate::operations::slice`].
    ///
    /// ```
    /// use ndcompute::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::from_fn(&[3, 3], |i| (3 * i[0] + i[1]) as f64);
    /// assert_eq!(t.slice(&[1..3, 0..1]).unwrap().data(), &[3.0, 6.0]);
    /// ```
    pub fn slice(&self, ranges: &[Range<usize>]) -> Result<Self, TensorError> {
        crate::operations::slice(self, ranges)
    }
}

fn require_countable(shape: &[usize]) -> Result<usize, TensorError> {
    checked_element_count(shape).ok_or(TensorError::ShapeMismatch {
        expected: usize::MAX,
        actual: 0,
    })
}
