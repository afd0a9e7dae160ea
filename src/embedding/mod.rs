//! Text-to-vector embedding providers.
//!
//! Provides the [`EmbeddingProvider`] trait, a local implementation using ONNX
//! Runtime, and a deterministic hashing implementation that needs no model
//! files. Providers are created via [`create_provider`] from configuration and
//! published to request handlers through a [`ProviderHandle`].

pub mod handle;
pub mod hash;
pub mod local;

pub use handle::{NotReady, ProviderHandle};

use anyhow::Result;

/// Trait for embedding text into vectors.
///
/// Every vector returned by one provider has exactly [`dimensions`](Self::dimensions)
/// elements, one per input, in input order. All methods are synchronous; callers
/// in async contexts should use `tokio::task::spawn_blocking`. Implementations
/// whose backend cannot run concurrently must serialize internally.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts. With `normalize`, every non-zero vector has unit L2 norm.
    fn encode(&self, batch: &[&str], normalize: bool) -> Result<Vec<Vec<f32>>>;

    /// Return the number of dimensions this provider produces.
    fn dimensions(&self) -> usize;

    /// Identifier of the loaded model.
    fn model_name(&self) -> &str;

    /// Device inference runs on (e.g. `"cpu"`).
    fn device(&self) -> &str;

    /// Token length at which inputs are truncated, if the provider tokenizes.
    fn max_seq_length(&self) -> Option<usize> {
        None
    }
}

/// Create an embedding provider from config.
///
/// `"local"` loads ONNX Runtime model files (run `paper-embed model download` first);
/// `"hash"` builds the deterministic hashing provider.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "local" => {
            let provider = local::LocalEmbeddingProvider::new(config)?;
            Ok(Box::new(provider))
        }
        "hash" => {
            let provider = hash::HashEmbeddingProvider::new(&config.model, config.hash_dimensions);
            Ok(Box::new(provider))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: local, hash"),
    }
}

/// L2-normalize a vector. Returns the input unchanged if its norm is zero.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbeddingConfig;

    #[test]
    fn test_l2_normalize() {
        let v = vec![3.0, 4.0];
        let normalized = l2_normalize(&v);
        assert!((normalized[0] - 0.6).abs() < 1e-6);
        assert!((normalized[1] - 0.8).abs() < 1e-6);
        let norm: f32 = normalized.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let v = vec![0.0, 0.0, 0.0];
        let normalized = l2_normalize(&v);
        assert_eq!(normalized, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn create_hash_provider() {
        let config = EmbeddingConfig {
            provider: "hash".into(),
            hash_dimensions: 16,
            ..EmbeddingConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.dimensions(), 16);
        assert_eq!(provider.model_name(), "all-MiniLM-L6-v2");
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let config = EmbeddingConfig {
            provider: "openai".into(),
            ..EmbeddingConfig::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("unknown embedding provider"));
    }
}
