use thiserror::Error;

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("gateway returned status {status}")]
    Status { status: u16, body: String },

    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to decode gateway response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, LLMError>;
