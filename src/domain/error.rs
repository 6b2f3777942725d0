use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Missing credentials, return URL, order id or capture id. Raised before
    /// any network call; retrying will not help.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("provider request failed with status {status}: {body}")]
    ProviderRequest { status: u16, body: String },

    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected provider response: {0}")]
    UnexpectedResponse(String),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("validation: {0}")]
    Validation(String),
}

impl PaymentError {
    /// Whether re-issuing the same call (with the same idempotency key) can
    /// succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::ProviderRequest { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
