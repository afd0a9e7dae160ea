//! Embedding request pipeline: validate, clean, chunk, encode, assemble.
//!
//! [`EmbeddingService`] wires the stages together over a [`ProviderHandle`].
//! Every call is synchronous and stateless relative to prior calls.

pub mod assembler;
pub mod error;
pub mod normalizer;
pub mod planner;
pub mod similarity;
pub mod types;

use std::time::Instant;

use chrono::Utc;

use crate::config::EmbeddingConfig;
use crate::embedding::ProviderHandle;
use error::PipelineError;
use normalizer::TextNormalizer;
use types::{
    EmbeddingRequest, EmbeddingResponse, HealthReport, ModelInfo, SimilarityRequest,
    SimilarityResult,
};

#[derive(Clone)]
pub struct EmbeddingService {
    provider: ProviderHandle,
    normalizer: TextNormalizer,
    /// Configured model id, reported by health checks before the model loads.
    model_name: String,
    device: String,
}

impl EmbeddingService {
    pub fn new(provider: ProviderHandle, config: &EmbeddingConfig) -> Self {
        Self {
            provider,
            normalizer: TextNormalizer::new(config.max_batch_size, config.max_text_length),
            model_name: config.model.clone(),
            device: config.resolved_device().unwrap_or("cpu").to_string(),
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn is_ready(&self) -> bool {
        self.provider.is_ready()
    }

    /// Embed every text in `request`, one vector per text in input order.
    pub fn generate(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, PipelineError> {
        let started = Instant::now();
        let provider = self.provider.get()?;

        self.normalizer.validate(&request.texts)?;
        let texts = self.normalizer.preprocess(&request.texts);

        tracing::info!(count = texts.len(), "generating embeddings");

        let chunks = planner::plan(&texts, request.batch_size, self.normalizer.max_batch_size);
        let mut outputs = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let batch: Vec<&str> = chunk.iter().map(String::as_str).collect();
            let vectors = provider
                .encode(&batch, request.normalize)
                .map_err(PipelineError::Producer)?;
            outputs.push(vectors);
        }

        let response = assembler::assemble(
            outputs,
            &texts,
            provider.model_name(),
            started.elapsed().as_secs_f64(),
        )
        .map_err(|e| {
            tracing::error!(
                error = %e,
                texts = texts.len(),
                model = provider.model_name(),
                dimensions = provider.dimensions(),
                "provider violated output contract"
            );
            e
        })?;

        tracing::info!(
            count = response.embeddings.len(),
            elapsed_ms = (response.processing_time * 1000.0) as u64,
            "embeddings generated"
        );

        Ok(response)
    }

    /// Cosine similarity of two caller-supplied vectors. Needs no model.
    pub fn similarity(&self, request: &SimilarityRequest) -> Result<SimilarityResult, PipelineError> {
        let similarity = similarity::cosine_similarity(&request.embedding1, &request.embedding2)?;
        Ok(SimilarityResult {
            similarity,
            method: "cosine".into(),
            dimensions: request.embedding1.len(),
        })
    }

    pub fn model_info(&self) -> Result<ModelInfo, PipelineError> {
        let provider = self.provider.get()?;
        Ok(ModelInfo {
            model_name: provider.model_name().to_string(),
            dimensions: provider.dimensions(),
            device: provider.device().to_string(),
            max_batch_size: self.normalizer.max_batch_size,
            max_seq_length: provider.max_seq_length(),
            max_text_length: self.normalizer.max_text_length,
        })
    }

    pub fn health(&self) -> HealthReport {
        let loaded = self.provider.get().ok();
        let status = if loaded.is_some() { "healthy" } else { "initializing" };
        HealthReport {
            status: status.into(),
            timestamp: Utc::now().to_rfc3339(),
            model_loaded: loaded.is_some(),
            model_name: loaded
                .as_ref()
                .map(|p| p.model_name().to_string())
                .unwrap_or_else(|| self.model_name.clone()),
            device: loaded
                .as_ref()
                .map(|p| p.device().to_string())
                .unwrap_or_else(|| self.device.clone()),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
