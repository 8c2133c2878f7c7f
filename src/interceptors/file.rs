use super::Interceptor;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Writes each exchange to `<dir>/<label>_<timestamp>.md`.
#[derive(Debug)]
pub struct FileInterceptor {
    base_path: PathBuf,
}

impl FileInterceptor {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn transcript(prompt: &str, response: &str) -> String {
    format!("# Prompt\n\n{}\n\n# Response\n\n{}\n", prompt, response)
}

#[async_trait]
impl Interceptor for FileInterceptor {
    async fn save(&self, label: &str, prompt: &str, response: &str) -> std::io::Result<()> {
        let timestamp = Utc::now();
        let filename = format!("{}_{}.md", label, timestamp.format("%Y%m%d_%H%M%S_%3f"));
        let file_path = self.base_path.join(filename);

        fs::create_dir_all(&self.base_path).await?;

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(transcript(prompt, response).as_bytes()).await?;
        file.flush().await?;

        debug!(path = %file_path.display(), "Saved transcript");
        Ok(())
    }
}
