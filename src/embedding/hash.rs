//! Deterministic feature-hashing embedding provider.
//!
//! Each lowercase word is hashed with FNV-1a into one of `dimensions` buckets,
//! with a sign taken from a second bit of the hash. The output is a pure
//! function of the input, so texts sharing words land close together and
//! repeated calls return identical vectors.

use anyhow::Result;

use super::{l2_normalize, EmbeddingProvider};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashEmbeddingProvider {
    model_name: String,
    dimensions: usize,
}

impl HashEmbeddingProvider {
    pub fn new(model_name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model_name: model_name.into(),
            dimensions: dimensions.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        for word in text.split_whitespace() {
            let h = fnv1a(word.to_lowercase().as_bytes());
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        v
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

impl EmbeddingProvider for HashEmbeddingProvider {
    fn encode(&self, batch: &[&str], normalize: bool) -> Result<Vec<Vec<f32>>> {
        Ok(batch
            .iter()
            .map(|text| {
                let v = self.embed_one(text);
                if normalize {
                    l2_normalize(&v)
                } else {
                    v
                }
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn device(&self) -> &str {
        "cpu"
    }
}
