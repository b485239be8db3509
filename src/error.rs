use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Protocol(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cart line {0} not found")]
    UnknownLine(String),

    #[error("payment provider is not initialised")]
    PaymentProviderUnavailable,

    #[error("checkout session token missing from response")]
    MissingSessionToken,

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
