//! Contiguous row-major storage.

use crate::scalar::Scalar;
use crate::storage::TensorStorage;

/// Owned, contiguous elements in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<ElT: Scalar>(Vec<ElT>);

impl<ElT: Scalar> TensorStorage<ElT> for Dense<ElT> {
    fn zeros(len: usize) -> Self {
        Self(vec![ElT::zero(); len])
    }

    fn from_vec(data: Vec<ElT>) -> Self {
        Self(data)
    }

    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn as_slice(&self) -> &[ElT] {
        &self.0
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [ElT] {
        &mut self.0
    }

    fn into_vec(self) -> Vec<ElT> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::c64;

    #[test]
    fn test_zeros() {
        let d: Dense<c64> = Dense::zeros(4);
        assert_eq!(d.len(), 4);
        assert!(d.as_slice().iter().all(|&z| z == c64::new(0.0, 0.0)));
        assert!(Dense::<f64>::zeros(0).is_empty());
    }

    #[test]
    fn test_mutation_and_into_vec() {
        let mut d = Dense::from_vec(vec![1.0, 2.0, 3.0]);
        d.as_mut_slice()[1] = -2.0;
        assert_eq!(d.into_vec(), vec![1.0, -2.0, 3.0]);
    }
}
