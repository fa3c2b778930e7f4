//! Summary payload produced by the content processor.

use serde::{Deserialize, Serialize};

/// The output of one summarization: the text plus auxiliary fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The generated summary text
    pub text: String,
    /// Character count of the input that was summarized
    pub input_chars: usize,
    /// Generation timestamp (Unix milliseconds)
    pub generated_at: u64,
}
