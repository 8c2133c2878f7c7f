use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyQueryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("Store error: {0}")]
    Store(String),
}

/// Failure of a single call to the text generation service.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("No text generated")]
    NoTextGenerated,
    #[error("AI error: {0}")]
    Ai(#[from] AIError),
}

impl GenerationError {
    /// Key used to look up a retry budget in `RetryConfig`.
    pub fn retry_key(&self) -> &'static str {
        match self {
            GenerationError::NoTextGenerated => "no_text",
            GenerationError::Ai(AIError::Gemini(GeminiError::RateLimit)) => "rate_limit",
            GenerationError::Ai(AIError::Gemini(GeminiError::Http(_))) => "http_error",
            GenerationError::Ai(AIError::Gemini(GeminiError::Api(_))) => "api_error",
            GenerationError::Ai(AIError::Gemini(GeminiError::Authentication)) => "authentication",
            GenerationError::Ai(AIError::Mock(_)) => "mock",
        }
    }
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("Gemini API error: {0}")]
    Gemini(#[from] GeminiError),
    #[error("Mock error: {0}")]
    Mock(String),
}

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

pub type StudyResult<T> = Result<T, StudyQueryError>;
