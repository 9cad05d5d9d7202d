//! Capability-based provider selection.
//!
//! The registry never owns providers: it keeps `Weak` references, and a
//! provider dropped by its owner simply stops being selectable.
//!
//! ```
//! use std::sync::Arc;
//! use ndcompute::backend::{
//!     Capabilities, GpuSparseBackend, MulticoreCpuBackend, NaiveCpuBackend, Provider,
//! };
//! use ndcompute::BackendRegistry;
//!
//! let gpu = Arc::new(GpuSparseBackend::new());
//! let naive = Arc::new(NaiveCpuBackend::new());
//! let multicore = Arc::new(MulticoreCpuBackend::new().unwrap());
//!
//! let mut registry = BackendRegistry::<f64>::new();
//! registry.register(&gpu);
//! registry.register(&naive);
//! registry.register(&multicore);
//!
//! // The GPU provider has no device, so it is skipped.
//! let chosen = registry.select(Capabilities::TENSOR_CONSTRUCTION).unwrap();
//! assert_eq!(chosen.name(), "naive-cpu");
//! let chosen = registry.select(Capabilities::PARALLEL).unwrap();
//! assert_eq!(chosen.name(), "multicore-cpu");
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use log::{trace, warn};

use crate::backend::{BackendProvider, Capabilities};
use crate::error::{Result, TensorError};
use crate::scalar::Scalar;

/// Non-owning list of providers, in registration order.
pub struct BackendRegistry<ElT: Scalar> {
    entries: Vec<Entry<ElT>>,
}

struct Entry<ElT: Scalar> {
    name: String,
    provider: Weak<dyn BackendProvider<ElT>>,
}

impl<ElT: Scalar> BackendRegistry<ElT> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a provider without taking ownership. Names need not be
    /// unique.
    pub fn register<P>(&mut self, provider: &Arc<P>)
    where
        P: BackendProvider<ElT> + 'static,
    {
        let provider: Arc<dyn BackendProvider<ElT>> = provider.clone();
        self.register_dyn(&provider);
    }

    /// Register an already type-erased provider.
    pub fn register_dyn(&mut self, provider: &Arc<dyn BackendProvider<ElT>>) {
        trace!("registering provider `{}`", provider.name());
        self.entries.push(Entry {
            name: provider.name().to_string(),
            provider: Arc::downgrade(provider),
        });
    }

    /// Most recently registered live provider called `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn BackendProvider<ElT>>> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.name == name)
            .find_map(|entry| entry.provider.upgrade())
    }

    /// First provider, in registration order, that has every capability in
    /// `required` and is available right now.
    ///
    /// Availability is checked on every call; nothing is cached.
    ///
    /// # Errors
    ///
    /// `NoBackendAvailable` if no live provider qualifies.
    pub fn select(&self, required: Capabilities) -> Result<Arc<dyn BackendProvider<ElT>>> {
        for entry in &self.entries {
            let Some(provider) = entry.provider.upgrade() else {
                warn!("provider `{}` was dropped; skipping", entry.name);
                continue;
            };
            if !provider.capabilities().contains(required) {
                trace!(
                    "`{}` lacks {} (has {})",
                    entry.name,
                    required,
                    provider.capabilities()
                );
                continue;
            }
            if !provider.is_available() {
                trace!("`{}` is unavailable", entry.name);
                continue;
            }
            trace!("selected `{}` for {}", entry.name, required);
            return Ok(provider);
        }
        Err(TensorError::NoBackendAvailable { required })
    }

    /// Try each capability set in order and return the first selection that
    /// succeeds.
    ///
    /// # Errors
    ///
    /// `NoBackendAvailable` for the last set if every set fails.
    pub fn select_with_fallback(
        &self,
        preferences: &[Capabilities],
    ) -> Result<Arc<dyn BackendProvider<ElT>>> {
        let mut last = TensorError::NoBackendAvailable {
            required: Capabilities::empty(),
        };
        for &required in preferences {
            match self.select(required) {
                Ok(provider) => return Ok(provider),
                Err(err) => {
                    trace!("no provider for {required}, falling back");
                    last = err;
                }
            }
        }
        Err(last)
    }

    /// Live providers in registration order.
    pub fn providers(&self) -> Vec<Arc<dyn BackendProvider<ElT>>> {
        self.entries
            .iter()
            .filter_map(|entry| entry.provider.upgrade())
            .collect()
    }

    /// Number of registered entries, including dropped providers not yet
    /// pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget dropped providers. Returns how many entries were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.provider.strong_count() > 0);
        before - self.entries.len()
    }
}

impl<ElT: Scalar> Default for BackendRegistry<ElT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ElT: Scalar> fmt::Debug for BackendRegistry<ElT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GpuSparseBackend, MulticoreCpuBackend, NaiveCpuBackend};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_registry_is_send_sync() {
        assert_send_sync::<BackendRegistry<f64>>();
    }

    #[test]
    fn test_select_order_and_capabilities() {
        let naive = Arc::new(NaiveCpuBackend::new());
        let multicore = Arc::new(MulticoreCpuBackend::new().unwrap());
        let mut registry = BackendRegistry::<f64>::new();
        registry.register(&naive);
        registry.register(&multicore);

        let p = registry.select(Capabilities::LINEAR_ALGEBRA).unwrap();
        assert_eq!(p.name(), "naive-cpu");
        let p = registry
            .select(Capabilities::LINEAR_ALGEBRA | Capabilities::PARALLEL)
            .unwrap();
        assert_eq!(p.name(), "multicore-cpu");
        assert!(matches!(
            registry.select(Capabilities::GPU),
            Err(TensorError::NoBackendAvailable { required }) if required == Capabilities::GPU
        ));
    }

    #[test]
    fn test_dropped_provider_is_skipped() {
        let naive = Arc::new(NaiveCpuBackend::new());
        let mut registry = BackendRegistry::<f64>::new();
        registry.register(&naive);
        drop(naive);

        assert!(registry.select(Capabilities::empty()).is_err());
        assert!(registry.get("naive-cpu").is_none());
        assert!(registry.providers().is_empty());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.prune(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_prefers_latest() {
        let first = Arc::new(NaiveCpuBackend::new());
        let second = Arc::new(NaiveCpuBackend::new());
        let mut registry = BackendRegistry::<f64>::new();
        registry.register(&first);
        registry.register(&second);

        let got = registry.get("naive-cpu").unwrap();
        assert_eq!(Arc::as_ptr(&got) as *const (), Arc::as_ptr(&second) as *const ());

        drop(got);
        drop(second);
        let got = registry.get("naive-cpu").unwrap();
        assert_eq!(Arc::as_ptr(&got) as *const (), Arc::as_ptr(&first) as *const ());
    }

    #[test]
    fn test_fallback() {
        let gpu = Arc::new(GpuSparseBackend::new());
        let multicore = Arc::new(MulticoreCpuBackend::new().unwrap());
        let mut registry = BackendRegistry::<f64>::new();
        registry.register(&gpu);
        registry.register(&multicore);

        let p = registry
            .select_with_fallback(&[Capabilities::GPU, Capabilities::PARALLEL])
            .unwrap();
        assert_eq!(p.name(), "multicore-cpu");

        assert!(matches!(
            registry.select_with_fallback(&[]),
            Err(TensorError::NoBackendAvailable { .. })
        ));
    }
}
