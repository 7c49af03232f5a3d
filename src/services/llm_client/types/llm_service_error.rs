use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmServiceError {
    #[error("failed to read prompt {file}: {source}")]
    Prompt {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion contained no choices")]
    EmptyResponse,
}
