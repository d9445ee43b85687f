// src/connections/error.rs

/// Failure talking to the cache or search store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Redis(#[from] redis::RedisError),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("elasticsearch returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}
