use std::sync::Arc;

use anyhow::{Context, Result};

use paper_embed::config::ServiceConfig;
use paper_embed::embedding::{self, EmbeddingProvider, ProviderHandle};
use paper_embed::pipeline::types::EmbeddingRequest;
use paper_embed::pipeline::EmbeddingService;

/// Embed texts from the terminal and print the response JSON to stdout.
pub async fn embed(
    config: &ServiceConfig,
    texts: Vec<String>,
    normalize: bool,
    batch_size: Option<usize>,
) -> Result<()> {
    let emb_config = config.embedding.clone();
    let provider: Arc<dyn EmbeddingProvider> = tokio::task::spawn_blocking(move || {
        embedding::create_provider(&emb_config).map(Arc::<dyn EmbeddingProvider>::from)
    })
    .await
    .context("model loader task panicked")??;

    let service = EmbeddingService::new(ProviderHandle::ready(provider), &config.embedding);
    let request = EmbeddingRequest {
        texts,
        normalize,
        batch_size,
    };

    let response = tokio::task::spawn_blocking(move || service.generate(request))
        .await
        .context("embedding task panicked")??;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
