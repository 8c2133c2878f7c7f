use async_trait::async_trait;
use std::fmt::Debug;

/// Observer of prompt/response pairs, used for transcripts.
#[async_trait]
pub trait Interceptor: Send + Sync + Debug {
    /// `label` names the exchange, e.g. `questions_test` or `content`.
    async fn save(&self, label: &str, prompt: &str, response: &str) -> std::io::Result<()>;
}

pub mod file;
pub use file::FileInterceptor;
