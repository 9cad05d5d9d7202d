//! Field sources.

use std::f64::consts::PI;

use crate::config::DipoleConfig;
use crate::field::SpacetimePoint;

/// Below this distance from the dipole the field is defined as zero.
const SOURCE_RADIUS: f64 = 1e-12;

/// Supplies individual field tensor components.
///
/// Implementations must be pure: the same arguments always give the same
/// value, whichever thread asks.
pub trait FieldSource: Send + Sync {
    /// `F^{μν}` at `point`, for `μ < ν < 4`.
    fn component(&self, point: &SpacetimePoint, mu: usize, nu: usize) -> f64;
}

/// Electric dipole at the origin along `z`, oscillating as `p0 cos(ωt)`.
///
/// Fields include the near (`1/r³`), intermediate (`1/r²`) and radiation
/// (`1/r`) terms, evaluated at the retarded time `t - r/c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatingDipole {
    moment: f64,
    omega: f64,
    c: f64,
    epsilon0: f64,
}

impl OscillatingDipole {
    pub fn new(config: &DipoleConfig) -> Self {
        Self {
            moment: config.moment,
            omega: config.angular_frequency,
            c: config.speed_of_light,
            epsilon0: config.permittivity,
        }
    }

    pub fn speed_of_light(&self) -> f64 {
        self.c
    }

    /// `(E, B)` at `point`.
    pub fn fields(&self, point: &SpacetimePoint) -> ([f64; 3], [f64; 3]) {
        let r = point.radius();
        if r < SOURCE_RADIUS {
            return ([0.0; 3], [0.0; 3]);
        }
        let n = point.spatial().map(|x| x / r);
        let c = self.c;

        let phase = self.omega * (point.t - r / c);
        // p, dp/dt, d²p/dt² all point along z.
        let p = self.moment * phase.cos();
        let p_dot = -self.moment * self.omega * phase.sin();
        let p_ddot = -self.moment * self.omega * self.omega * phase.cos();

        let k = 1.0 / (4.0 * PI * self.epsilon0);
        let mu0_4pi = 1.0 / (4.0 * PI * self.epsilon0 * c * c);
        let r2 = r * r;
        let r3 = r2 * r;

        let mut e = [0.0; 3];
        for (i, e_i) in e.iter_mut().enumerate() {
            let z_i = if i == 2 { 1.0 } else { 0.0 };
            // 3n(n·v) - v and (n×v)×n = v - n(n·v) for v along z
            let static_like = 3.0 * n[i] * n[2] - z_i;
            let transverse = z_i - n[i] * n[2];
            *e_i = k
                * (p * static_like / r3
                    + p_dot * static_like / (c * r2)
                    + p_ddot * transverse / (c * c * r));
        }

        // v × n for v along z is v (-n_y, n_x, 0)
        let b_scale = mu0_4pi * (p_dot / r2 + p_ddot / (c * r));
        let b = [-b_scale * n[1], b_scale * n[0], 0.0];

        (e, b)
    }
}

impl Default for OscillatingDipole {
    fn default() -> Self {
        Self::new(&DipoleConfig::default())
    }
}

impl FieldSource for OscillatingDipole {
    fn component(&self, point: &SpacetimePoint, mu: usize, nu: usize) -> f64 {
        let (e, b) = self.fields(point);
        match (mu, nu) {
            (0, i @ 1..=3) => -e[i - 1] / self.c,
            (1, 2) => -b[2],
            (1, 3) => b[1],
            (2, 3) => -b[0],
            _ => 0.0,
        }
    }
}
