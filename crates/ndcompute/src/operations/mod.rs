//! Sequential tensor operations.
//!
//! These functions are the reference kernels behind the providers:
//!
//! ```text
//! Level 1: Provider API (BackendProvider::add, multiply, inverse, ...)
//!     → create execution context
//!     → call a kernel below (or a parallel variant of it)
//!
//! Level 2: Kernels (this module)
//!     → validate shapes, allocate output, loop
//! ```

mod elementwise;
mod lu;
mod norm;
mod permutedims;
mod product;
mod slice;
mod sum;

pub use elementwise::{add, hadamard, map, scale, subtract, zip_with};
pub use lu::{
    LuFactors, check_pivots, determinant, inverse, permutation_is_odd, require_finite,
    singular_tolerance,
};
pub use norm::{norm, norm_sqr};
pub use permutedims::{permutedims, transpose};
pub use product::{ProductKind, dot, matmul, matvec, multiply};
pub use slice::{broadcast, slice};
pub use sum::{sum, sum_axis};

pub(crate) use norm::slice_norm_sqr;
pub(crate) use product::{dot_dims, dot_slices, matmul_dims, matvec_dims};
