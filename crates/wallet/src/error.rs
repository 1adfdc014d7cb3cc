use promo_core::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    /// The provider answered and refused the operation.
    #[error("provider rejected request: {code}")]
    Rejected { code: String },

    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),
}

impl WalletError {
    /// A rejection that carries no code.
    pub fn is_blank_rejection(&self) -> bool {
        matches!(self, WalletError::Rejected { code } if code.trim().is_empty())
    }

    /// Error code stored on the page session for this failure.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            WalletError::Rejected { code } if !code.trim().is_empty() => {
                ErrorCode::from(code.trim())
            }
            WalletError::Rejected { .. } => ErrorCode::NetworkError,
            WalletError::Transport(_) | WalletError::InvalidResponse(_) | WalletError::Url(_) => {
                ErrorCode::NetworkError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_provider_code() {
        let err = WalletError::Rejected {
            code: "VOUCHER_ALREADY_CLAIMED".to_string(),
        };
        assert_eq!(err.error_code(), ErrorCode::VoucherAlreadyClaimed);
    }

    #[test]
    fn test_blank_rejection() {
        let err = WalletError::Rejected {
            code: " ".to_string(),
        };
        assert!(err.is_blank_rejection());
        assert_eq!(err.error_code(), ErrorCode::NetworkError);
        assert!(!WalletError::Transport("down".to_string()).is_blank_rejection());
    }

    #[test]
    fn test_transport_failure_is_network_error() {
        let err = WalletError::Transport("connection refused".to_string());
        assert_eq!(err.error_code(), ErrorCode::NetworkError);
    }
}
