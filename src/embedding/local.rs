//! Local ONNX Runtime embedding provider.
//!
//! Implements [`EmbeddingProvider`] for sentence-transformers models exported to
//! ONNX. Handles tokenization, inference, mean pooling, and optional L2
//! normalization. The output dimensionality is read from the model itself with
//! a probe encode at load time.
//!
//! The truncation length comes from `sentence_bert_config.json` when the model
//! directory has one, then from the tokenizer's own truncation settings, and
//! falls back to [`DEFAULT_MAX_SEQ_LEN`].

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;

use super::{l2_normalize, EmbeddingProvider};
use crate::config::EmbeddingConfig;

/// Sequence length used when neither the model config nor the tokenizer names one.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

pub struct LocalEmbeddingProvider {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    /// BERT-style exports take segment ids; MPNet and similar do not.
    token_type_ids: bool,
    max_seq_len: usize,
    model_name: String,
    device: String,
    dimensions: usize,
}

// Safety: Tokenizer is Send+Sync. Session is behind a Mutex.
// The Mutex guarantees exclusive access during run().
unsafe impl Send for LocalEmbeddingProvider {}
unsafe impl Sync for LocalEmbeddingProvider {}

impl LocalEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let device = config.resolved_device()?;
        let model_dir = config.model_dir();
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(
            model_path.exists(),
            "ONNX model not found at {}. Run `paper-embed model download` first.",
            model_path.display()
        );
        anyhow::ensure!(
            tokenizer_path.exists(),
            "Tokenizer not found at {}. Run `paper-embed model download` first.",
            tokenizer_path.display()
        );

        tracing::info!(model = %config.model, device, "loading embedding model");

        let session = Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(&model_path)
            .context("failed to load ONNX model")?;

        let token_type_ids = accepts_token_type_ids(session.inputs().iter().map(|i| i.name()));
        tracing::info!(model = %model_path.display(), token_type_ids, "ONNX model loaded");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("failed to load tokenizer: {e}"))?;

        let max_seq_len = match read_max_seq_len(&model_dir)? {
            Some(len) => len,
            None => tokenizer
                .get_truncation()
                .map(|t| t.max_length)
                .unwrap_or(DEFAULT_MAX_SEQ_LEN),
        };

        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: max_seq_len,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("failed to set truncation: {e}"))?;

        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            strategy: tokenizers::PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        tracing::info!(tokenizer = %tokenizer_path.display(), max_seq_len, "tokenizer loaded");

        let mut provider = Self {
            session: Mutex::new(session),
            tokenizer,
            token_type_ids,
            max_seq_len,
            model_name: config.model.clone(),
            device: device.to_string(),
            dimensions: 0,
        };

        let probe = provider.run(&["dimension probe"], false)?;
        provider.dimensions = probe.first().map(Vec::len).unwrap_or(0);
        anyhow::ensure!(provider.dimensions > 0, "model produced empty embeddings");

        tracing::info!(dimensions = provider.dimensions, "model dimensions");

        Ok(provider)
    }

    fn run(&self, texts: &[&str], normalize: bool) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        // Step 1: Tokenize
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))?;

        let batch_size = encodings.len();
        let seq_len = encodings[0].get_ids().len();

        // Step 2: Build flat input tensors as i64
        let mut input_ids_flat = Vec::with_capacity(batch_size * seq_len);
        let mut attention_mask_flat = Vec::with_capacity(batch_size * seq_len);

        for encoding in &encodings {
            input_ids_flat.extend(encoding.get_ids().iter().map(|&id| id as i64));
            attention_mask_flat.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
        }

        let shape = vec![batch_size as i64, seq_len as i64];
        let input_ids_tensor =
            Tensor::from_array((shape.clone(), input_ids_flat.into_boxed_slice()))?;
        let attention_mask_tensor =
            Tensor::from_array((shape.clone(), attention_mask_flat.clone().into_boxed_slice()))?;

        let mut inputs = ort::inputs! {
            "input_ids" => input_ids_tensor,
            "attention_mask" => attention_mask_tensor,
        };
        if self.token_type_ids {
            // Single sentence, no segment B.
            let token_type_ids = vec![0i64; batch_size * seq_len];
            let token_type_ids_tensor =
                Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;
            inputs.push(("token_type_ids".into(), token_type_ids_tensor.into()));
        }

        // Step 3: Run ONNX inference
        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("session lock poisoned: {e}"))?;

        let outputs = session.run(inputs)?;

        // Step 4: Extract token embeddings, shape [batch, seq_len, hidden].
        // The output name varies by ONNX export. Try common names, fall back to index 0.
        let token_emb_value = outputs
            .get("token_embeddings")
            .or_else(|| outputs.get("last_hidden_state"))
            .unwrap_or_else(|| &outputs[0]);

        let (shape, data) = token_emb_value
            .try_extract_tensor::<f32>()
            .context("failed to extract token_embeddings tensor")?;

        let dims: &[i64] = &shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[0] as usize == batch_size,
            "unexpected token_embeddings shape: {dims:?}, expected [{batch_size}, seq, hidden]"
        );
        let hidden_dim = dims[2] as usize;
        let actual_seq_len = dims[1] as usize;
        if self.dimensions > 0 {
            anyhow::ensure!(
                hidden_dim == self.dimensions,
                "model hidden size changed: {hidden_dim}, expected {}",
                self.dimensions
            );
        }

        // Step 5: Mean pooling with attention mask
        let mut results = Vec::with_capacity(batch_size);
        for b in 0..batch_size {
            let mut sum = vec![0.0f32; hidden_dim];
            let mut count = 0.0f32;

            for s in 0..actual_seq_len {
                let mask = attention_mask_flat[b * seq_len + s] as f32;
                if mask > 0.0 {
                    let offset = (b * actual_seq_len + s) * hidden_dim;
                    for (d, acc) in sum.iter_mut().enumerate() {
                        *acc += data[offset + d] * mask;
                    }
                    count += mask;
                }
            }

            if count > 0.0 {
                for acc in &mut sum {
                    *acc /= count;
                }
            }

            // Step 6: optional L2 normalize
            results.push(if normalize { l2_normalize(&sum) } else { sum });
        }

        Ok(results)
    }
}

impl EmbeddingProvider for LocalEmbeddingProvider {
    fn encode(&self, batch: &[&str], normalize: bool) -> Result<Vec<Vec<f32>>> {
        self.run(batch, normalize)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn device(&self) -> &str {
        &self.device
    }

    fn max_seq_length(&self) -> Option<usize> {
        Some(self.max_seq_len)
    }
}

fn accepts_token_type_ids<'a>(mut input_names: impl Iterator<Item = &'a str>) -> bool {
    input_names.any(|name| name == "token_type_ids")
}

/// `max_seq_length` from a sentence-transformers `sentence_bert_config.json`, if present.
fn read_max_seq_len(model_dir: &Path) -> Result<Option<usize>> {
    let path = model_dir.join("sentence_bert_config.json");
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config["max_seq_length"]
        .as_u64()
        .map(|len| len as usize)
        .filter(|&len| len > 0))
}
