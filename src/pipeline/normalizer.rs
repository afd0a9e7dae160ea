//! Input validation and cleanup ahead of the model.

use serde_json::Value;

use super::error::ValidationError;

/// Suffix appended to texts cut down by [`TextNormalizer::preprocess`].
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy)]
pub struct TextNormalizer {
    pub max_batch_size: usize,
    /// Measured in characters, not bytes.
    pub max_text_length: usize,
}

impl TextNormalizer {
    pub fn new(max_batch_size: usize, max_text_length: usize) -> Self {
        Self {
            max_batch_size,
            max_text_length,
        }
    }

    /// Turn raw JSON array elements into strings, reporting the first
    /// non-string by index. Count limits are checked before element types.
    pub fn coerce(&self, values: Vec<Value>) -> Result<Vec<String>, ValidationError> {
        self.check_count(values.len())?;
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::String(s) => Ok(s),
                _ => Err(ValidationError::InvalidElement { index }),
            })
            .collect()
    }

    /// Reject empty or oversized batches and oversized texts.
    /// Blank texts are allowed but logged.
    pub fn validate(&self, texts: &[String]) -> Result<(), ValidationError> {
        self.check_count(texts.len())?;

        for (index, text) in texts.iter().enumerate() {
            let length = text.chars().count();
            if length > self.max_text_length {
                return Err(ValidationError::TextTooLong {
                    index,
                    length,
                    max: self.max_text_length,
                });
            }
            if text.trim().is_empty() {
                tracing::warn!(index, "empty text");
            }
        }
        Ok(())
    }

    fn check_count(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyInput);
        }
        if size > self.max_batch_size {
            return Err(ValidationError::BatchTooLarge {
                size,
                max: self.max_batch_size,
            });
        }
        Ok(())
    }

    /// Collapse whitespace runs and truncate anything still over the limit.
    ///
    /// Truncation is independent of [`validate`](Self::validate): it keeps
    /// `max_text_length - 3` characters and appends `"..."`.
    pub fn preprocess(&self, texts: &[String]) -> Vec<String> {
        texts.iter().map(|text| self.clean(text)).collect()
    }

    fn clean(&self, text: &str) -> String {
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.chars().count() <= self.max_text_length {
            return cleaned;
        }
        let keep = self.max_text_length.saturating_sub(ELLIPSIS.len());
        let mut truncated: String = cleaned.chars().take(keep).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    }
}
