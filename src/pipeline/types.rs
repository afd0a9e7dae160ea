//! Request and response values for the embedding service.
//!
//! All of these are request-scoped: built when a request arrives, consumed
//! synchronously, dropped once the response is serialized.

use serde::{Deserialize, Serialize};

/// `normalize` when a caller leaves it out.
pub fn default_normalize() -> bool {
    true
}

/// A batch of texts to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRequest {
    pub texts: Vec<String>,
    /// Return unit-length vectors.
    pub normalize: bool,
    /// Chunk size override, capped at the configured maximum. `0` counts as unset.
    pub batch_size: Option<usize>,
}

impl EmbeddingRequest {
    pub fn new(texts: Vec<String>) -> Self {
        Self {
            texts,
            normalize: default_normalize(),
            batch_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// One vector per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    pub model: String,
    /// Seconds spent handling the request.
    pub processing_time: f64,
    /// Whitespace-delimited word count over the preprocessed texts. This is an
    /// approximation, not the model tokenizer's count.
    pub total_tokens: usize,
    /// Length of each vector, or 0 when there are none.
    pub dimensions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRequest {
    pub embedding1: Vec<f32>,
    pub embedding2: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub similarity: f64,
    pub method: String,
    pub dimensions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub dimensions: usize,
    pub device: String,
    pub max_batch_size: usize,
    pub max_seq_length: Option<usize>,
    pub max_text_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `"healthy"` once the model is loaded, `"initializing"` before.
    pub status: String,
    pub timestamp: String,
    pub model_loaded: bool,
    pub model_name: String,
    pub device: String,
    pub version: String,
}
