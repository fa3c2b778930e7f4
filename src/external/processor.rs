//! Content Processor Seam
//!
//! The opaque asynchronous computation the deduplication cache wraps.
//! It must resolve or fail exactly once per invocation; timeouts are the
//! implementation's responsibility.

use async_trait::async_trait;

use crate::cache::current_timestamp_ms;
use crate::dedup::normalize;
use crate::error::{DigestError, Result};
use crate::models::Summary;

// == Content Processor Trait ==
#[async_trait]
pub trait ContentProcessor: Send + Sync {
    /// Produces a summary for the normalized input.
    async fn invoke(&self, input: &str) -> Result<Summary>;
}

// == Extractive Processor ==
/// Built-in fallback processor: keeps the leading sentences of the
/// input. Deployments wanting model-generated summaries substitute
/// their own [`ContentProcessor`].
pub struct ExtractiveProcessor {
    max_sentences: usize,
}

impl ExtractiveProcessor {
    pub fn new(max_sentences: usize) -> Self {
        Self { max_sentences }
    }
}

impl Default for ExtractiveProcessor {
    fn default() -> Self {
        Self::new(3)
    }
}

#[async_trait]
impl ContentProcessor for ExtractiveProcessor {
    async fn invoke(&self, input: &str) -> Result<Summary> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return Err(DigestError::InvalidRequest(
                "No content to summarize".to_string(),
            ));
        }

        let mut sentences = Vec::new();
        let mut start = 0;
        for (i, c) in normalized.char_indices() {
            if matches!(c, '.' | '!' | '?') {
                let sentence = normalized[start..=i].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = i + c.len_utf8();
                if sentences.len() == self.max_sentences {
                    break;
                }
            }
        }
        // Trailing fragment without terminal punctuation
        if sentences.len() < self.max_sentences {
            let tail = normalized[start.min(normalized.len())..].trim();
            if !tail.is_empty() {
                sentences.push(tail);
            }
        }

        Ok(Summary {
            text: sentences.join(" "),
            input_chars: normalized.chars().count(),
            generated_at: current_timestamp_ms(),
        })
    }
}
