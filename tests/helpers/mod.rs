#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use paper_embed::config::EmbeddingConfig;
use paper_embed::embedding::hash::HashEmbeddingProvider;
use paper_embed::embedding::{EmbeddingProvider, ProviderHandle};
use paper_embed::handlers::{self, AppState};
use paper_embed::pipeline::EmbeddingService;

/// Dimensionality of the stub provider used across tests.
pub const TEST_DIM: usize = 3;

/// Embedding config with small limits and the hashing provider.
pub fn test_config(max_batch_size: usize, max_text_length: usize) -> EmbeddingConfig {
    EmbeddingConfig {
        provider: "hash".into(),
        model: "test-model".into(),
        max_batch_size,
        max_text_length,
        hash_dimensions: TEST_DIM,
        ..EmbeddingConfig::default()
    }
}

/// A handle that is ready with a deterministic `TEST_DIM`-wide stub provider.
pub fn stub_handle() -> ProviderHandle {
    let provider: Arc<dyn EmbeddingProvider> =
        Arc::new(HashEmbeddingProvider::new("test-model", TEST_DIM));
    ProviderHandle::ready(provider)
}

/// A ready service with the given limits.
pub fn test_service(max_batch_size: usize, max_text_length: usize) -> EmbeddingService {
    EmbeddingService::new(stub_handle(), &test_config(max_batch_size, max_text_length))
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Serve the router for `handle` on an ephemeral local port. Returns the base URL.
pub async fn spawn_app(handle: ProviderHandle, config: &EmbeddingConfig) -> String {
    let service = EmbeddingService::new(handle, config);
    let router = handlers::router(AppState { service }, &[]).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}
