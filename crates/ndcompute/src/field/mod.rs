//! Electromagnetic field tensor.
//!
//! ```text
//! FieldTensorKernel::evaluate(point)
//!     → open context on the chosen provider
//!     → 6 upper-triangle slots F^{μν}, μ < ν   (rayon when PARALLEL)
//!     → mirror: F^{νμ} = -F^{μν}, F^{μμ} = 0
//!     → release context
//! ```
//!
//! Components use the (+, -, -, -) signature:
//! `F^{0i} = -E_i / c`, `F^{12} = -B_z`, `F^{13} = B_y`, `F^{23} = -B_x`.

mod kernel;
mod source;

pub use kernel::FieldTensorKernel;
pub use source::{FieldSource, OscillatingDipole};

use crate::tensor::DenseTensor;

/// An event in spacetime.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpacetimePoint {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SpacetimePoint {
    pub fn new(t: f64, x: f64, y: f64, z: f64) -> Self {
        Self { t, x, y, z }
    }

    pub fn spatial(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Distance from the spatial origin.
    pub fn radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// The `(μ, ν)` slots with `μ < ν`, in evaluation order.
pub const UPPER_SLOTS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// Antisymmetric 4×4 field tensor `F^{μν}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTensor {
    components: [[f64; 4]; 4],
}

impl FieldTensor {
    /// Build from the upper-triangle values listed in [`UPPER_SLOTS`] order.
    ///
    /// ```
    /// use ndcompute::field::FieldTensor;
    ///
    /// let f = FieldTensor::from_upper([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(f.get(0, 3), Some(3.0));
    /// assert_eq!(f.get(3, 0), Some(-3.0));
    /// assert_eq!(f.get(2, 2), Some(0.0));
    /// ```
    pub fn from_upper(upper: [f64; 6]) -> Self {
        let mut components = [[0.0; 4]; 4];
        for (&(mu, nu), value) in UPPER_SLOTS.iter().zip(upper) {
            components[mu][nu] = value;
            components[nu][mu] = -value;
        }
        Self { components }
    }

    /// The zero field.
    pub fn zero() -> Self {
        Self::from_upper([0.0; 6])
    }

    /// `F^{μν}`, or `None` if an index exceeds 3.
    pub fn get(&self, mu: usize, nu: usize) -> Option<f64> {
        self.components.get(mu).and_then(|row| row.get(nu)).copied()
    }

    pub fn components(&self) -> &[[f64; 4]; 4] {
        &self.components
    }

    /// Electric field `E_i = -c F^{0i}`.
    pub fn electric_field(&self, speed_of_light: f64) -> [f64; 3] {
        let f = &self.components;
        [
            -speed_of_light * f[0][1],
            -speed_of_light * f[0][2],
            -speed_of_light * f[0][3],
        ]
    }

    /// Magnetic field `(B_x, B_y, B_z) = (-F^{23}, F^{13}, -F^{12})`.
    pub fn magnetic_field(&self) -> [f64; 3] {
        let f = &self.components;
        [-f[2][3], f[1][3], -f[1][2]]
    }

    /// Largest component magnitude.
    pub fn max_abs(&self) -> f64 {
        self.components
            .iter()
            .flatten()
            .fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }

    /// Lorentz invariant `F_{μν} F^{μν} = 2 (B² - E²/c²)`.
    pub fn invariant(&self) -> f64 {
        let f = &self.components;
        let temporal: f64 = (1..4).map(|i| f[0][i] * f[0][i]).sum();
        let spatial = f[1][2] * f[1][2] + f[1][3] * f[1][3] + f[2][3] * f[2][3];
        2.0 * (spatial - temporal)
    }

    /// Whether `F^{μν} == -F^{νμ}` exactly and the diagonal is zero.
    pub fn is_antisymmetric(&self) -> bool {
        (0..4).all(|mu| {
            self.components[mu][mu] == 0.0
                && (0..4).all(|nu| self.components[mu][nu] == -self.components[nu][mu])
        })
    }

    /// Copy into a row-major `[4, 4]` tensor.
    pub fn to_tensor(&self) -> DenseTensor<f64> {
        DenseTensor::from_fn(&[4, 4], |idx| self.components[idx[0]][idx[1]])
    }
}
