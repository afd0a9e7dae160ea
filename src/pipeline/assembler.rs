//! Merging per-chunk provider output into the final response.

use super::error::AssemblyError;
use super::types::EmbeddingResponse;

/// Approximate token count: whitespace-delimited words, not a tokenizer count.
pub fn estimate_tokens(texts: &[String]) -> usize {
    texts.iter().map(|t| t.split_whitespace().count()).sum()
}

/// Concatenate chunk outputs in chunk order and compute response statistics.
///
/// `texts` are the preprocessed inputs the chunks were built from. Fails if
/// the provider returned a different number of vectors than texts, or vectors
/// of differing lengths.
pub fn assemble(
    chunks: Vec<Vec<Vec<f32>>>,
    texts: &[String],
    model_name: &str,
    elapsed_seconds: f64,
) -> Result<EmbeddingResponse, AssemblyError> {
    let embeddings: Vec<Vec<f32>> = chunks.into_iter().flatten().collect();

    if embeddings.len() != texts.len() {
        return Err(AssemblyError::CountMismatch {
            expected: texts.len(),
            actual: embeddings.len(),
        });
    }

    let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
    if let Some((index, v)) = embeddings
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != dimensions)
    {
        return Err(AssemblyError::RaggedVector {
            index,
            expected: dimensions,
            actual: v.len(),
        });
    }

    Ok(EmbeddingResponse {
        embeddings,
        model: model_name.to_string(),
        processing_time: elapsed_seconds,
        total_tokens: estimate_tokens(texts),
        dimensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn concatenates_in_chunk_order() {
        let texts = strings(&["a", "b", "c"]);
        let chunks = vec![vec![vec![1.0, 0.0], vec![2.0, 0.0]], vec![vec![3.0, 0.0]]];
        let resp = assemble(chunks, &texts, "m", 0.5).unwrap();
        let firsts: Vec<f32> = resp.embeddings.iter().map(|v| v[0]).collect();
        assert_eq!(firsts, vec![1.0, 2.0, 3.0]);
        assert_eq!(resp.dimensions, 2);
        assert_eq!(resp.model, "m");
        assert_eq!(resp.processing_time, 0.5);
    }

    #[test]
    fn token_estimate_is_word_split() {
        let texts = strings(&["hello world", "foo bar baz"]);
        assert_eq!(estimate_tokens(&texts), 5);
        assert_eq!(estimate_tokens(&strings(&["", "   "])), 0);
    }

    #[test]
    fn count_mismatch_is_an_error() {
        let texts = strings(&["a", "b"]);
        let err = assemble(vec![vec![vec![1.0]]], &texts, "m", 0.0).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::CountMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn ragged_vectors_are_an_error() {
        let texts = strings(&["a", "b"]);
        let chunks = vec![vec![vec![1.0, 2.0]], vec![vec![1.0]]];
        let err = assemble(chunks, &texts, "m", 0.0).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::RaggedVector {
                index: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn no_vectors_means_zero_dimensions() {
        let resp = assemble(vec![], &[], "m", 0.0).unwrap();
        assert_eq!(resp.dimensions, 0);
        assert!(resp.embeddings.is_empty());
    }
}
