//! Multicore provider on a dedicated rayon thread pool.
//!
//! ```text
//! kernel(a, b)
//!     → open ThreadPool context
//!     → len < parallel_threshold ? sequential kernel
//!                                : par_iter inside pool.install
//!     → release context
//! ```
//!
//! Matrix products go to faer's GEMM with `Par::rayon`. Determinants and
//! inverses go through faer's partial-pivot LU, run inside the pool so its
//! rayon work lands on the provider's threads.

use std::sync::Arc;

use faer::linalg::matmul::matmul;
use faer::linalg::solvers::{PartialPivLu, Solve};
use faer::{Accum, Mat, Par};
use log::{debug, error};
use rayon::prelude::*;

use crate::backend::faer_interop::{AsFaerMat, as_faer_mat_mut, tensor_from_faer_mat};
use crate::backend::{
    BackendProvider, Capabilities, ContextResources, ContextTracker, ExecutionContext, Provider,
    run_in_context,
};
use crate::config::ComputeConfig;
use crate::error::{Result, TensorError};
use crate::operations::{
    self, ProductKind, check_pivots, dot_dims, dot_slices, matmul_dims, matvec_dims,
    permutation_is_odd, require_finite, singular_tolerance, slice_norm_sqr,
};
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Provider running kernels on its own rayon pool.
#[derive(Debug)]
pub struct MulticoreCpuBackend {
    pool: Arc<rayon::ThreadPool>,
    parallel_threshold: usize,
    singular_epsilon: f64,
    tracker: Arc<ContextTracker>,
}

impl MulticoreCpuBackend {
    pub const NAME: &'static str = "multicore-cpu";

    /// Provider with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&ComputeConfig::default())
    }

    /// Build the thread pool from `config.num_threads` (0 = rayon default).
    ///
    /// # Errors
    ///
    /// `Config` if `config` fails validation, `BackendUnavailable` if the
    /// pool cannot be built.
    pub fn with_config(config: &ComputeConfig) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(|i| format!("ndcompute-worker-{i}"))
            .build()
            .map_err(|e| {
                error!("failed to build rayon pool: {e}");
                TensorError::BackendUnavailable {
                    backend: Self::NAME.to_string(),
                }
            })?;
        debug!(
            "constructing {} provider ({} threads, parallel_threshold = {})",
            Self::NAME,
            pool.current_num_threads(),
            config.parallel_threshold
        );
        Ok(Self {
            pool: Arc::new(pool),
            parallel_threshold: config.parallel_threshold,
            singular_epsilon: config.singular_epsilon,
            tracker: ContextTracker::new(),
        })
    }

    /// Worker threads in the pool.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    fn is_large(&self, len: usize) -> bool {
        len >= self.parallel_threshold
    }

    fn zip_with<ElT, F>(
        &self,
        ctx: &ExecutionContext,
        a: &DenseTensor<ElT>,
        b: &DenseTensor<ElT>,
        f: F,
    ) -> Result<DenseTensor<ElT>>
    where
        ElT: Scalar,
        F: Fn(ElT, ElT) -> ElT + Send + Sync,
    {
        if !self.is_large(a.len()) {
            return operations::zip_with(a, b, f);
        }
        a.require_same_shape(b)?;
        let mut out = DenseTensor::zeros(a.shape());
        ctx.install(|| {
            out.data_mut()
                .par_iter_mut()
                .zip(a.data().par_iter())
                .zip(b.data().par_iter())
                .for_each(|((o, &x), &y)| *o = f(x, y));
        })?;
        Ok(out)
    }

    fn matmul<ElT: Scalar>(
        &self,
        ctx: &ExecutionContext,
        a: &DenseTensor<ElT>,
        b: &DenseTensor<ElT>,
    ) -> Result<DenseTensor<ElT>> {
        let (m, _, n) = matmul_dims(a, b)?;
        let mut c = DenseTensor::zeros(&[m, n]);
        let a_mat = a.as_faer_mat()?;
        let b_mat = b.as_faer_mat()?;
        let threads = self.num_threads();
        {
            let c_mat = as_faer_mat_mut(&mut c)?;
            // C = 1 * A * B, overwriting C
            ctx.install(|| {
                matmul(
                    c_mat,
                    Accum::Replace,
                    a_mat,
                    b_mat,
                    ElT::one(),
                    Par::rayon(threads),
                )
            })?;
        }
        Ok(c)
    }

    fn matvec<ElT: Scalar>(
        &self,
        ctx: &ExecutionContext,
        a: &DenseTensor<ElT>,
        v: &DenseTensor<ElT>,
    ) -> Result<DenseTensor<ElT>> {
        if !self.is_large(a.len()) {
            return operations::matvec(a, v);
        }
        let (m, k) = matvec_dims(a, v)?;
        let mut out = DenseTensor::zeros(&[m]);
        ctx.install(|| {
            out.data_mut()
                .par_iter_mut()
                .zip(a.data().par_chunks(k.max(1)))
                .for_each(|(o, row)| *o = dot_slices(row, v.data()));
        })?;
        Ok(out)
    }

    /// `PA = LU` of a square matrix, factored in the pool.
    fn factor<ElT: Scalar>(
        &self,
        ctx: &ExecutionContext,
        matrix: &DenseTensor<ElT>,
    ) -> Result<PartialPivLu<ElT>> {
        matrix.square_order()?;
        let mat = matrix.as_faer_mat()?;
        ctx.install(|| mat.partial_piv_lu())
    }
}

/// Signed product of the pivots.
fn lu_determinant<ElT: Scalar>(lu: &PartialPivLu<ElT>) -> ElT {
    let u = lu.U();
    let pivots: Vec<ElT> = (0..u.nrows()).map(|i| u[(i, i)]).collect();
    // Entries factored after an exact zero pivot are not meaningful.
    if pivots.contains(&ElT::zero()) {
        return ElT::zero();
    }
    let diag = pivots.into_iter().fold(ElT::one(), |acc, p| acc * p);
    let (forward, _) = lu.P().arrays();
    if permutation_is_odd(forward) { -diag } else { diag }
}

impl Provider for MulticoreCpuBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::TENSOR_CONSTRUCTION
            | Capabilities::ELEMENTWISE
            | Capabilities::LINEAR_ALGEBRA
            | Capabilities::PARALLEL
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_context(&self) -> Result<ExecutionContext> {
        Ok(ExecutionContext::open(
            Self::NAME,
            ContextResources::ThreadPool(Arc::clone(&self.pool)),
            &self.tracker,
        ))
    }

    fn active_contexts(&self) -> usize {
        self.tracker.active()
    }
}

impl<ElT: Scalar> BackendProvider<ElT> for MulticoreCpuBackend {
    fn add(&self, a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |ctx| self.zip_with(ctx, a, b, |x, y| x + y))
    }

    fn subtract(&self, a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |ctx| self.zip_with(ctx, a, b, |x, y| x - y))
    }

    fn multiply(&self, a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |ctx| match ProductKind::of(a, b) {
            ProductKind::Matrix => self.matmul(ctx, a, b),
            ProductKind::MatrixVector => self.matvec(ctx, a, b),
            ProductKind::Elementwise => self.zip_with(ctx, a, b, |x, y| x * y),
        })
    }

    fn scale(&self, a: &DenseTensor<ElT>, alpha: ElT) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |ctx| {
            if !self.is_large(a.len()) {
                return Ok(operations::scale(a, alpha));
            }
            let mut out = DenseTensor::zeros(a.shape());
            ctx.install(|| {
                out.data_mut()
                    .par_iter_mut()
                    .zip(a.data().par_iter())
                    .for_each(|(o, &x)| *o = x * alpha);
            })?;
            Ok(out)
        })
    }

    fn transpose(&self, matrix: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |ctx| {
            let (rows, cols) = matrix.matrix_dims()?;
            if !self.is_large(matrix.len()) {
                return operations::transpose(matrix);
            }
            let src = matrix.data();
            let mut out = DenseTensor::zeros(&[cols, rows]);
            ctx.install(|| {
                out.data_mut()
                    .par_chunks_mut(rows.max(1))
                    .enumerate()
                    .for_each(|(j, out_row)| {
                        for (i, o) in out_row.iter_mut().enumerate() {
                            *o = src[i * cols + j];
                        }
                    });
            })?;
            Ok(out)
        })
    }

    fn dot(&self, a: &DenseTensor<ElT>, b: &DenseTensor<ElT>) -> Result<ElT> {
        run_in_context(self, |ctx| {
            let len = dot_dims(a, b)?;
            if !self.is_large(len) {
                return Ok(dot_slices(a.data(), b.data()));
            }
            ctx.install(|| {
                a.data()
                    .par_iter()
                    .zip(b.data().par_iter())
                    .map(|(&x, &y)| x * y)
                    .reduce(ElT::zero, |acc, v| acc + v)
            })
        })
    }

    fn norm(&self, a: &DenseTensor<ElT>) -> Result<f64> {
        run_in_context(self, |ctx| {
            if !self.is_large(a.len()) {
                return Ok(operations::norm(a));
            }
            let chunk = self.parallel_threshold.max(1);
            let sum = ctx.install(|| {
                a.data()
                    .par_chunks(chunk)
                    .map(slice_norm_sqr)
                    .sum::<f64>()
            })?;
            Ok(sum.sqrt())
        })
    }

    fn inverse(&self, matrix: &DenseTensor<ElT>) -> Result<DenseTensor<ElT>> {
        run_in_context(self, |ctx| {
            let n = matrix.square_order()?;
            if n == 0 {
                return Ok(DenseTensor::zeros(&[0, 0]));
            }
            let lu = self.factor(ctx, matrix)?;
            let tolerance = singular_tolerance(matrix, self.singular_epsilon);
            let u = lu.U();
            let pivot = check_pivots((0..n).map(|i| u[(i, i)].modulus()), tolerance)?;

            let mut x = Mat::<ElT>::identity(n, n);
            ctx.install(|| lu.solve_in_place(&mut x))?;
            require_finite(tensor_from_faer_mat(x.as_ref()), pivot, tolerance)
        })
    }

    fn determinant(&self, matrix: &DenseTensor<ElT>) -> Result<ElT> {
        run_in_context(self, |ctx| {
            if matrix.square_order()? == 0 {
                return Ok(ElT::one());
            }
            let lu = self.factor(ctx, matrix)?;
            Ok(lu_determinant(&lu))
        })
    }
}
