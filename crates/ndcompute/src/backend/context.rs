//! Scoped execution resources.
//!
//! A provider hands out an [`ExecutionContext`] for each kernel invocation.
//! The context holds the provider's resources (nothing, a rayon pool, or a
//! device handle) until it is released, and the provider's
//! [`ContextTracker`] counts how many contexts are live.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};

use crate::error::{Result, TensorError};

/// Resources held by a live context.
#[derive(Debug, Clone)]
pub enum ContextResources {
    /// Run on the calling thread.
    Sequential,
    /// Run inside a rayon pool owned by the provider.
    ThreadPool(Arc<rayon::ThreadPool>),
    /// Handle to an accelerator device.
    Device { device_id: usize },
}

/// Live-context accounting shared between a provider and its contexts.
#[derive(Debug, Default)]
pub struct ContextTracker {
    active: AtomicUsize,
}

impl ContextTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of contexts created and not yet released.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    fn acquire(&self) {
        self.active.fetch_add(1, Ordering::AcqRel);
    }

    fn release(&self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Scoped resource handle owned by exactly one provider.
///
/// Released explicitly with [`ExecutionContext::release`] or implicitly on
/// drop. After release every operation fails with
/// [`TensorError::ContextReleased`].
#[derive(Debug)]
pub struct ExecutionContext {
    backend: String,
    resources: Option<ContextResources>,
    tracker: Arc<ContextTracker>,
}

impl ExecutionContext {
    /// Open a context for `backend` and count it in `tracker`.
    pub fn open(backend: &str, resources: ContextResources, tracker: &Arc<ContextTracker>) -> Self {
        tracker.acquire();
        debug!(
            "opened {:?} context for backend `{}` ({} live)",
            resources,
            backend,
            tracker.active()
        );
        Self {
            backend: backend.to_string(),
            resources: Some(resources),
            tracker: Arc::clone(tracker),
        }
    }

    /// Name of the owning provider.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn is_released(&self) -> bool {
        self.resources.is_none()
    }

    /// The held resources.
    pub fn resources(&self) -> Result<&ContextResources> {
        self.resources.as_ref().ok_or_else(|| self.released_error())
    }

    /// Whether work installed in this context runs on a thread pool.
    pub fn is_parallel(&self) -> bool {
        matches!(self.resources, Some(ContextResources::ThreadPool(_)))
    }

    /// Run `f` with this context's resources.
    ///
    /// With a thread pool, `f` runs inside the pool so that nested rayon
    /// iterators use the provider's workers. Otherwise `f` runs on the
    /// calling thread.
    pub fn install<R, F>(&self, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self.resources()? {
            ContextResources::ThreadPool(pool) => Ok(pool.install(f)),
            ContextResources::Sequential | ContextResources::Device { .. } => Ok(f()),
        }
    }

    /// Give the resources back to the provider.
    ///
    /// # Errors
    ///
    /// `ContextReleased` if already released; provider state is untouched.
    pub fn release(&mut self) -> Result<()> {
        if self.resources.take().is_none() {
            return Err(self.released_error());
        }
        self.tracker.release();
        debug!(
            "released context for backend `{}` ({} live)",
            self.backend,
            self.tracker.active()
        );
        Ok(())
    }

    fn released_error(&self) -> TensorError {
        TensorError::ContextReleased {
            backend: self.backend.clone(),
        }
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        if !self.is_released() {
            warn!(
                "context for backend `{}` dropped without release",
                self.backend
            );
            // Cannot fail: the context is live.
            let _ = self.release();
        }
    }
}
