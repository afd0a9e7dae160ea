//! Chunking of validated texts into provider-sized batches.

/// Chunk size actually used: `min(requested or max, max, len)`.
///
/// A requested size of 0 is treated as "not given". The result is at least 1
/// whenever `len` is non-zero.
pub fn effective_chunk_size(requested: Option<usize>, max_batch_size: usize, len: usize) -> usize {
    let requested = requested.filter(|&n| n > 0).unwrap_or(max_batch_size);
    requested.min(max_batch_size).min(len).max(1)
}

/// Split `texts` into contiguous, order-preserving chunks. Every text appears in
/// exactly one chunk; the last chunk may be shorter.
pub fn plan<'a>(
    texts: &'a [String],
    requested_batch_size: Option<usize>,
    max_batch_size: usize,
) -> Vec<&'a [String]> {
    if texts.is_empty() {
        return Vec::new();
    }
    let size = effective_chunk_size(requested_batch_size, max_batch_size, texts.len());
    texts.chunks(size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("text {i}")).collect()
    }

    fn sizes(chunks: &[&[String]]) -> Vec<usize> {
        chunks.iter().map(|c| c.len()).collect()
    }

    #[test]
    fn ten_texts_max_four() {
        let input = texts(10);
        let chunks = plan(&input, None, 4);
        assert_eq!(sizes(&chunks), vec![4, 4, 2]);
        let flattened: Vec<String> = chunks.concat();
        assert_eq!(flattened, input);
    }

    #[test]
    fn requested_size_is_capped_by_max() {
        let input = texts(10);
        assert_eq!(sizes(&plan(&input, Some(100), 4)), vec![4, 4, 2]);
        assert_eq!(sizes(&plan(&input, Some(3), 4)), vec![3, 3, 3, 1]);
    }

    #[test]
    fn zero_request_means_default() {
        let input = texts(5);
        assert_eq!(sizes(&plan(&input, Some(0), 32)), vec![5]);
    }

    #[test]
    fn chunk_size_never_exceeds_len() {
        assert_eq!(effective_chunk_size(None, 32, 2), 2);
        assert_eq!(effective_chunk_size(Some(1), 32, 2), 1);
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(plan(&[], None, 4).is_empty());
    }
}
