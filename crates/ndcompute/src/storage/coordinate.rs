//! Coordinate storage: only non-zero entries are kept, keyed by linear index.

use std::collections::BTreeMap;

use crate::scalar::Scalar;

/// Sparse storage holding the non-zero entries of a flat array.
///
/// Entries are keyed by their row-major linear index. Exact zeros are never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate<ElT: Scalar> {
    entries: BTreeMap<usize, ElT>,
    len: usize,
}

impl<ElT: Scalar> Coordinate<ElT> {
    /// Empty storage for `len` logical elements.
    pub fn zeros(len: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            len,
        }
    }

    /// Build from a dense slice, dropping exact zeros.
    pub fn from_dense(data: &[ElT]) -> Self {
        let entries = data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != ElT::zero())
            .map(|(i, &v)| (i, v))
            .collect();
        Self {
            entries,
            len: data.len(),
        }
    }

    /// Logical length (including zeros).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if storage has zero logical length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Value at linear index `i` (zero if not stored). `None` if out of range.
    pub fn get(&self, i: usize) -> Option<ElT> {
        if i >= self.len {
            return None;
        }
        Some(self.entries.get(&i).copied().unwrap_or_else(ElT::zero))
    }

    /// Iterate over `(linear_index, value)` pairs of stored entries.
    pub fn iter(&self) -> impl Iterator<Item = (usize, ElT)> + '_ {
        self.entries.iter().map(|(&i, &v)| (i, v))
    }

    /// Expand to a dense vector.
    pub fn to_dense(&self) -> Vec<ElT> {
        let mut data = vec![ElT::zero(); self.len];
        for (i, v) in self.iter() {
            data[i] = v;
        }
        data
    }
}
