//! Failure taxonomy for the embedding pipeline.

use thiserror::Error;

use crate::embedding::NotReady;

/// Client-caused request problems. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Texts list cannot be empty")]
    EmptyInput,

    #[error("Batch size {size} exceeds maximum {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Text at index {index} must be a string")]
    InvalidElement { index: usize },

    #[error("Text at index {index} exceeds maximum length {max} (got {length})")]
    TextTooLong {
        index: usize,
        length: usize,
        max: usize,
    },

    /// Request body could not be decoded into the expected shape.
    #[error("{0}")]
    Malformed(String),
}

impl ValidationError {
    /// Index of the offending element, when the failure names one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::InvalidElement { index } | Self::TextTooLong { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// The provider broke its output contract. Fatal for the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("provider returned {actual} embeddings for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding {index} has {actual} dimensions, expected {expected}")]
    RaggedVector {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Embeddings must have the same dimensions ({left} vs {right})")]
pub struct DimensionMismatch {
    pub left: usize,
    pub right: usize,
}

/// Two caller-supplied vectors that cannot be compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimilarityError {
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),

    #[error("{field} contains a non-finite value at position {position}")]
    NonFinite { field: &'static str, position: usize },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotReady(#[from] NotReady),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    #[error("embedding provider failed: {0:#}")]
    Producer(anyhow::Error),
}

impl PipelineError {
    /// Stable machine-readable kind, used as the `error` field of error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotReady(_) => "model_not_loaded",
            Self::Assembly(_) => "assembly_mismatch",
            Self::Similarity(SimilarityError::DimensionMismatch(_)) => "dimension_mismatch",
            Self::Similarity(SimilarityError::NonFinite { .. }) => "validation_error",
            Self::Producer(_) => "embedding_generation_failed",
        }
    }

    /// Whether the caller caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Similarity(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_limit_and_index() {
        let err = ValidationError::BatchTooLarge { size: 40, max: 32 };
        assert_eq!(err.to_string(), "Batch size 40 exceeds maximum 32");
        assert_eq!(err.index(), None);

        let err = ValidationError::TextTooLong {
            index: 2,
            length: 9000,
            max: 8192,
        };
        assert!(err.to_string().contains("index 2"));
        assert_eq!(err.index(), Some(2));
    }

    #[test]
    fn kinds() {
        assert_eq!(
            PipelineError::from(ValidationError::EmptyInput).kind(),
            "validation_error"
        );
        assert_eq!(PipelineError::from(NotReady).kind(), "model_not_loaded");
        assert_eq!(
            PipelineError::from(SimilarityError::from(DimensionMismatch { left: 2, right: 3 })).kind(),
            "dimension_mismatch"
        );
        let non_finite = PipelineError::from(SimilarityError::NonFinite {
            field: "embedding2",
            position: 0,
        });
        assert_eq!(non_finite.kind(), "validation_error");
        assert!(non_finite.is_client_error());
        assert!(!PipelineError::Producer(anyhow::anyhow!("boom")).is_client_error());
    }
}
