//! HTTP server startup.
//!
//! [`serve`] binds the listener first, then loads the embedding provider on the
//! blocking pool while requests are already being accepted. Until the load
//! finishes, model-backed endpoints answer 503. A load failure shuts the
//! server down.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::config::{EmbeddingConfig, ServiceConfig};
use crate::embedding::{self, EmbeddingProvider, ProviderHandle};
use crate::handlers::{self, AppState};
use crate::pipeline::EmbeddingService;

/// Load the configured provider and publish it into `handle`.
pub fn spawn_loader(config: EmbeddingConfig, handle: ProviderHandle) -> JoinHandle<Result<()>> {
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let provider: Arc<dyn EmbeddingProvider> =
            Arc::from(embedding::create_provider(&config)?);
        tracing::info!(
            model = %provider.model_name(),
            dimensions = provider.dimensions(),
            device = %provider.device(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "embedding provider ready"
        );
        handle.set(provider);
        Ok(())
    })
}

/// Start the embedding HTTP service and run until ctrl-c or a model load failure.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let bind_addr = config.bind_addr();

    tracing::info!(
        addr = %bind_addr,
        model = %config.embedding.model,
        provider = %config.embedding.provider,
        max_batch_size = config.embedding.max_batch_size,
        "starting embedding service"
    );

    let handle = ProviderHandle::empty();
    let service = EmbeddingService::new(handle.clone(), &config.embedding);
    let router = handlers::router(AppState { service }, &config.server.cors_origins)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}");

    let loader = spawn_loader(config.embedding.clone(), handle);

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let mut server = std::pin::pin!(server);

    tokio::select! {
        result = &mut server => {
            return result.context("HTTP server error");
        }
        loaded = loader => {
            let loaded = loaded.context("model loader task panicked")?;
            if let Err(e) = loaded {
                tracing::error!(error = %format!("{e:#}"), "failed to load embedding model");
                return Err(e.context("failed to start embedding service"));
            }
        }
    }

    server.await.context("HTTP server error")?;
    tracing::info!("embedding service shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down HTTP server");
}
