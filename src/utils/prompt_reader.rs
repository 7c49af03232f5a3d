use std::path::PathBuf;

use async_trait::async_trait;

use crate::services::llm_client::types::llm_service_error::LlmServiceError;

#[async_trait]
pub trait PromptReader: Send + Sync {
    async fn read_prompt(&self, file_name: &str) -> Result<String, LlmServiceError>;
}

/// Reads prompt templates from a directory on disk.
#[derive(Clone)]
pub struct PromptDirectory {
    dir: PathBuf,
}

impl PromptDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl PromptReader for PromptDirectory {
    async fn read_prompt(&self, file_name: &str) -> Result<String, LlmServiceError> {
        let path = self.dir.join(file_name);

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LlmServiceError::Prompt {
                file: path.display().to_string(),
                source,
            })
    }
}
