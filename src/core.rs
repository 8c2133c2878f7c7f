//! Text generation seam and retry policy.

use crate::error::{AIError, GenerationError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

/// Low-level text generation client.
///
/// Implementors provide `ask_raw`, which sends a prompt and returns the raw model
/// text. Empty-text detection, retries and parsing live in `QuestionGenerator`.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }
}

/// Retry budgets per error kind (see `GenerationError::retry_key`).
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: HashMap<String, usize>,
    pub default_max_retries: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let mut max_retries = HashMap::new();
        max_retries.insert("rate_limit".to_string(), 1);
        max_retries.insert("api_error".to_string(), 1);
        max_retries.insert("http_error".to_string(), 1);
        max_retries.insert("no_text".to_string(), 1);
        max_retries.insert("authentication".to_string(), 0);

        Self {
            max_retries,
            default_max_retries: 0,
        }
    }
}

impl RetryConfig {
    /// No retries for any error kind.
    pub fn none() -> Self {
        Self {
            max_retries: HashMap::new(),
            default_max_retries: 0,
        }
    }

    /// Same budget for every error kind except authentication.
    pub fn uniform(retries: usize) -> Self {
        let mut max_retries = HashMap::new();
        for key in ["rate_limit", "api_error", "http_error", "no_text", "mock"] {
            max_retries.insert(key.to_string(), retries);
        }
        max_retries.insert("authentication".to_string(), 0);
        Self {
            max_retries,
            default_max_retries: retries,
        }
    }

    pub fn max_retries_for(&self, error: &GenerationError) -> usize {
        self.max_retries
            .get(error.retry_key())
            .copied()
            .unwrap_or(self.default_max_retries)
    }
}
