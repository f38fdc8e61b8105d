use thiserror::Error;

/// Top-level error type for Besso.
#[derive(Debug, Error)]
pub enum BessoError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Service credential could not be decoded or exchanged for a token.
    #[error("credential error: {0}")]
    Credential(String),

    /// Error from the document store.
    #[error("store error: {0}")]
    Store(String),

    /// The voice-platform request is missing something a handler needs.
    #[error("request error: {0}")]
    Request(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
