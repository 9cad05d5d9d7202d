//! Capability flags advertised by providers.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of provider capabilities.
///
/// ```
/// use ndcompute::Capabilities;
///
/// let caps = Capabilities::ELEMENTWISE | Capabilities::PARALLEL;
/// assert!(caps.contains(Capabilities::PARALLEL));
/// assert!(!caps.contains(Capabilities::GPU | Capabilities::PARALLEL));
/// assert!(caps.contains(Capabilities::empty()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// zeros, ones, create.
    pub const TENSOR_CONSTRUCTION: Self = Self(1 << 0);
    /// add, subtract, scale, element-wise multiply.
    pub const ELEMENTWISE: Self = Self(1 << 1);
    /// matrix products, dot, inverse, determinant.
    pub const LINEAR_ALGEBRA: Self = Self(1 << 2);
    /// Kernels run on a thread pool.
    pub const PARALLEL: Self = Self(1 << 3);
    /// Kernels run on an accelerator device.
    pub const GPU: Self = Self(1 << 4);

    const NAMES: [(Self, &'static str); 5] = [
        (Self::TENSOR_CONSTRUCTION, "TENSOR_CONSTRUCTION"),
        (Self::ELEMENTWISE, "ELEMENTWISE"),
        (Self::LINEAR_ALGEBRA, "LINEAR_ALGEBRA"),
        (Self::PARALLEL, "PARALLEL"),
        (Self::GPU, "GPU"),
    ];

    /// The empty set; every provider satisfies it.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether every flag of `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|&(_, name)| name)
            .collect();
        write!(f, "{{{}}}", names.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_superset() {
        let cpu = Capabilities::TENSOR_CONSTRUCTION
            | Capabilities::ELEMENTWISE
            | Capabilities::LINEAR_ALGEBRA;
        assert!(cpu.contains(Capabilities::ELEMENTWISE | Capabilities::LINEAR_ALGEBRA));
        assert!(!cpu.contains(Capabilities::PARALLEL));
        assert!(Capabilities::empty().contains(Capabilities::empty()));
        assert!(!Capabilities::empty().contains(Capabilities::GPU));
    }

    #[test]
    fn test_bitor_assign() {
        let mut caps = Capabilities::empty();
        caps |= Capabilities::GPU;
        assert_eq!(caps, Capabilities::GPU);
    }

    #[test]
    fn test_display() {
        assert_eq!(Capabilities::empty().to_string(), "{}");
        assert_eq!(
            (Capabilities::GPU | Capabilities::TENSOR_CONSTRUCTION).to_string(),
            "{TENSOR_CONSTRUCTION | GPU}"
        );
    }
}
