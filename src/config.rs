use crate::core::RetryConfig;
use std::env;
use tracing::warn;

pub const DEFAULT_MAX_QUESTION_COUNT: usize = 15;

/// Trait for types that can retrieve their configuration key from environment variables
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Find the API key by checking environment variables, after loading `.env` if present
    fn find_key() -> Option<String> {
        // Silently ignore a missing .env file
        let _ = dotenvy::dotenv();

        env::var(Self::KEY_NAME).ok().filter(|key| !key.trim().is_empty())
    }
}

/// Limits and policies for `QuestionGenerator`.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Largest total question count accepted in one request.
    pub max_question_count: usize,
    /// Issue the per-type generation calls concurrently.
    pub concurrent_passes: bool,
    pub retry: RetryConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_question_count: DEFAULT_MAX_QUESTION_COUNT,
            concurrent_passes: true,
            retry: RetryConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Read `STUDY_MAX_QUESTIONS`, `STUDY_CONCURRENT_PASSES` and `STUDY_MAX_RETRIES`,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let max_question_count = parse_var("STUDY_MAX_QUESTIONS")
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_question_count);
        let concurrent_passes =
            parse_var("STUDY_CONCURRENT_PASSES").unwrap_or(defaults.concurrent_passes);
        let retry = parse_var("STUDY_MAX_RETRIES")
            .map(RetryConfig::uniform)
            .unwrap_or(defaults.retry);

        Self {
            max_question_count,
            concurrent_passes,
            retry,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_concurrent_passes(mut self, concurrent: bool) -> Self {
        self.concurrent_passes = concurrent;
        self
    }

    pub fn with_max_question_count(mut self, max: usize) -> Self {
        self.max_question_count = max;
        self
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}
