use thiserror::Error;

pub type PromoResult<T> = Result<T, PromoError>;

#[derive(Error, Debug)]
pub enum PromoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session capacity reached ({0} sessions)")]
    SessionCapacity(usize),

    #[error("Claim not available: {0}")]
    ClaimUnavailable(String),

    #[error("Invalid campaign window: {0}")]
    InvalidWindow(String),
}

impl From<config::ConfigError> for PromoError {
    fn from(e: config::ConfigError) -> Self {
        PromoError::Config(e.to_string())
    }
}
