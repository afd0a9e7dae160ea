//! Readiness-aware slot for the shared embedding provider.
//!
//! The server starts accepting traffic before the model finishes loading. The
//! loader fills the handle exactly once; until then [`ProviderHandle::get`]
//! returns [`NotReady`].

use std::sync::{Arc, OnceLock};

use super::EmbeddingProvider;

/// The provider has not finished initializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Embedding model is not loaded. Please wait for initialization.")]
pub struct NotReady;

#[derive(Clone, Default)]
pub struct ProviderHandle {
    slot: Arc<OnceLock<Arc<dyn EmbeddingProvider>>>,
}

impl ProviderHandle {
    /// A handle with no provider yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A handle that is ready immediately.
    pub fn ready(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let handle = Self::empty();
        handle.set(provider);
        handle
    }

    /// Publish the loaded provider. Returns `false` if one was already set.
    pub fn set(&self, provider: Arc<dyn EmbeddingProvider>) -> bool {
        self.slot.set(provider).is_ok()
    }

    pub fn get(&self) -> Result<Arc<dyn EmbeddingProvider>, NotReady> {
        self.slot.get().cloned().ok_or(NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }
}
