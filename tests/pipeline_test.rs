mod helpers;

use helpers::{strings, test_service, TEST_DIM};
use paper_embed::pipeline::error::{PipelineError, SimilarityError, ValidationError};
use paper_embed::pipeline::types::{EmbeddingRequest, SimilarityRequest};

#[test]
fn two_texts_five_tokens() {
    let service = test_service(32, 8192);
    let resp = service
        .generate(EmbeddingRequest::new(strings(&["hello world", "foo bar baz"])))
        .unwrap();

    assert_eq!(resp.embeddings.len(), 2);
    assert_eq!(resp.total_tokens, 5);
    assert_eq!(resp.dimensions, TEST_DIM);
    assert_eq!(resp.model, "test-model");
    assert!(resp.processing_time >= 0.0);
}

#[test]
fn every_embedding_has_reported_dimensions() {
    let service = test_service(32, 8192);
    let texts: Vec<String> = (0..10).map(|i| format!("sentence {i} about papers")).collect();
    let mut request = EmbeddingRequest::new(texts);
    request.batch_size = Some(4);
    let resp = service.generate(request).unwrap();
    assert_eq!(resp.embeddings.len(), 10);
    assert!(resp.embeddings.iter().all(|v| v.len() == resp.dimensions));
}

#[test]
fn dimensions_constant_across_calls() {
    let service = test_service(32, 8192);
    let a = service.generate(EmbeddingRequest::new(strings(&["one"]))).unwrap();
    let b = service
        .generate(EmbeddingRequest::new(strings(&["two three", "four"])))
        .unwrap();
    assert_eq!(a.dimensions, b.dimensions);
}

#[test]
fn empty_input_is_validation_error() {
    let service = test_service(32, 8192);
    let err = service.generate(EmbeddingRequest::new(vec![])).unwrap_err();
    assert!(matches!(err, PipelineError::Validation(ValidationError::EmptyInput)));
    assert!(err.is_client_error());
}

#[test]
fn oversized_batch_names_the_limit() {
    let service = test_service(2, 8192);
    let err = service
        .generate(EmbeddingRequest::new(strings(&["a", "b", "c"])))
        .unwrap_err();
    assert!(err.to_string().contains("maximum 2"));
}

#[test]
fn identical_requests_are_deterministic() {
    let service = test_service(32, 8192);
    let texts = strings(&["attention is all you need", "deep residual learning"]);
    let a = service.generate(EmbeddingRequest::new(texts.clone())).unwrap();
    let b = service.generate(EmbeddingRequest::new(texts)).unwrap();
    assert_eq!(a.embeddings, b.embeddings);
}

#[test]
fn chunking_does_not_change_output() {
    let service = test_service(32, 8192);
    let texts: Vec<String> = (0..7).map(|i| format!("token{i} shared words")).collect();

    let whole = service.generate(EmbeddingRequest::new(texts.clone())).unwrap();
    let mut chunked = EmbeddingRequest::new(texts);
    chunked.batch_size = Some(3);
    let chunked = service.generate(chunked).unwrap();

    assert_eq!(whole.embeddings, chunked.embeddings);
}

#[test]
fn normalize_flag_controls_unit_length() {
    let service = test_service(32, 8192);
    let texts = strings(&["repeated repeated repeated"]);

    let normalized = service.generate(EmbeddingRequest::new(texts.clone())).unwrap();
    let norm: f32 = normalized.embeddings[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);

    let mut raw = EmbeddingRequest::new(texts);
    raw.normalize = false;
    let raw = service.generate(raw).unwrap();
    let norm: f32 = raw.embeddings[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 3.0).abs() < 1e-5);
}

#[test]
fn whitespace_is_collapsed_before_counting() {
    let service = test_service(32, 8192);
    let resp = service
        .generate(EmbeddingRequest::new(strings(&["  spaced\t\tout \n text  "])))
        .unwrap();
    assert_eq!(resp.total_tokens, 3);
}

#[test]
fn text_too_long_reports_index() {
    let service = test_service(32, 10);
    let err = service
        .generate(EmbeddingRequest::new(strings(&["short", "this one is too long"])))
        .unwrap_err();
    match err {
        PipelineError::Validation(v) => assert_eq!(v.index(), Some(1)),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn similarity_of_generated_embeddings() {
    let service = test_service(32, 8192);
    let resp = service
        .generate(EmbeddingRequest::new(strings(&["graph neural networks", "graph neural networks"])))
        .unwrap();

    let result = service
        .similarity(&SimilarityRequest {
            embedding1: resp.embeddings[0].clone(),
            embedding2: resp.embeddings[1].clone(),
        })
        .unwrap();
    assert!((result.similarity - 1.0).abs() < 1e-4);
    assert_eq!(result.method, "cosine");
    assert_eq!(result.dimensions, TEST_DIM);
}

#[test]
fn similarity_of_negated_vector() {
    let service = test_service(32, 8192);
    let v = vec![0.5f32, -0.25, 2.0];
    let neg: Vec<f32> = v.iter().map(|x| -x).collect();
    let result = service
        .similarity(&SimilarityRequest {
            embedding1: v,
            embedding2: neg,
        })
        .unwrap();
    assert!((result.similarity + 1.0).abs() < 1e-4);
}

#[test]
fn similarity_length_mismatch() {
    let service = test_service(32, 8192);
    let err = service
        .similarity(&SimilarityRequest {
            embedding1: vec![1.0, 2.0, 3.0],
            embedding2: vec![1.0, 2.0],
        })
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Similarity(SimilarityError::DimensionMismatch(_))
    ));
}

#[test]
fn similarity_rejects_overflowed_values() {
    let service = test_service(32, 8192);
    let err = service
        .similarity(&SimilarityRequest {
            embedding1: vec![f32::INFINITY, 1.0],
            embedding2: vec![f32::INFINITY, 1.0],
        })
        .unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.kind(), "validation_error");
    assert!(err.to_string().contains("embedding1"));
}
