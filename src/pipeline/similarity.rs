//! Cosine similarity between precomputed vectors.

use ndarray::Array1;

use super::error::{DimensionMismatch, SimilarityError};

/// Cosine similarity of `a` and `b`, accumulated in f64.
///
/// Defined as 0.0 when either vector has zero norm. The result is clamped to
/// `[-1, 1]` to absorb rounding. NaN and infinite components are rejected, so a
/// successful result is always a finite number.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(DimensionMismatch {
            left: a.len(),
            right: b.len(),
        }
        .into());
    }
    ensure_finite("embedding1", a)?;
    ensure_finite("embedding2", b)?;

    let a: Array1<f64> = a.iter().map(|&x| f64::from(x)).collect();
    let b: Array1<f64> = b.iter().map(|&x| f64::from(x)).collect();

    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((a.dot(&b) / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

fn ensure_finite(field: &'static str, v: &[f32]) -> Result<(), SimilarityError> {
    match v.iter().position(|x| !x.is_finite()) {
        Some(position) => Err(SimilarityError::NonFinite { field, position }),
        None => Ok(()),
    }
}
