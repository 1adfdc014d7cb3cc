use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PromoError, PromoResult};

/// A campaign's claim window in epoch milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampaignWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl CampaignWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }
}

/// Parse an RFC 3339 timestamp into epoch milliseconds.
pub fn parse_rfc3339_ms(value: &str) -> PromoResult<i64> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| PromoError::InvalidWindow(format!("'{value}': {e}")))
}

/// The view state the landing page is currently in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoPhase {
    LoadingCampaign,
    Pre,
    Ongoing,
    Post,
    Success,
}

impl PromoPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromoPhase::LoadingCampaign => "LOADING_CAMPAIGN",
            PromoPhase::Pre => "PRE",
            PromoPhase::Ongoing => "ONGOING",
            PromoPhase::Post => "POST",
            PromoPhase::Success => "SUCCESS",
        }
    }

    /// SUCCESS is never left once entered.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PromoPhase::Success)
    }
}

impl fmt::Display for PromoPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error codes shown to the visitor, either returned by the wallet
/// provider or synthesized locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    VoucherIdRequired,
    InvalidVoucherCampaignId,
    VoucherIdDoesNotExist,
    VoucherAlreadyClaimed,
    CampaignMaxExceeded,
    SingleUseVoucherAlreadyClaimed,
    /// Campaign dates from the provider could not be parsed.
    InvalidCampaignDates,
    /// The provider could not be reached or answered garbage.
    NetworkError,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::VoucherIdRequired => "VOUCHER_ID_REQUIRED",
            ErrorCode::InvalidVoucherCampaignId => "INVALID_VOUCHER_CAMPAIGN_ID",
            ErrorCode::VoucherIdDoesNotExist => "VOUCHER_ID_DOES_NOT_EXIST",
            ErrorCode::VoucherAlreadyClaimed => "VOUCHER_ALREADY_CLAIMED",
            ErrorCode::CampaignMaxExceeded => "CAMPAIGN_MAX_EXCEEDED",
            ErrorCode::SingleUseVoucherAlreadyClaimed => "SINGLE_USE_VOUCHER_ALREADY_CLAIMED",
            ErrorCode::InvalidCampaignDates => "INVALID_CAMPAIGN_DATES",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Other(code) => code.as_str(),
        }
    }

    /// Message to display for this code. Codes without an entry in the
    /// table fall back to the default message.
    pub fn notice(&self) -> NoticeMessage {
        match self {
            ErrorCode::VoucherIdRequired => NoticeMessage::new(
                "Scan a QR code to claim!",
                Some("Be one of the first 99 people to scan one of the QR codes around you to claim your NFT!"),
            ),
            ErrorCode::InvalidVoucherCampaignId => NoticeMessage::new(
                "This QR code is not linked to a valid campaign.",
                Some("Scan one of the QR codes around you to claim your NFT!"),
            ),
            ErrorCode::VoucherIdDoesNotExist => NoticeMessage::new(
                "This ID does not exist in our system.",
                Some("Scan one of the QR codes around you to claim your NFT!"),
            ),
            ErrorCode::VoucherAlreadyClaimed => NoticeMessage::new(
                "You have already claimed this NFT.",
                Some("We will be distributing the NFT to your Portis Wallet in a couple of days."),
            ),
            ErrorCode::CampaignMaxExceeded => NoticeMessage::new(
                "Unfortunately, all available NFTs have already been claimed.",
                Some("Stay tuned for other opportunities to claim rare NFTs in the future!"),
            ),
            ErrorCode::SingleUseVoucherAlreadyClaimed => NoticeMessage::new(
                "Unfortunately, this NFT has already been claimed.",
                Some("Try scanning another QR code or stay tuned for other opportunities to claim rare NFTs in the future!"),
            ),
            ErrorCode::InvalidCampaignDates | ErrorCode::NetworkError | ErrorCode::Other(_) => {
                NoticeMessage::default_message()
            }
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "VOUCHER_ID_REQUIRED" => ErrorCode::VoucherIdRequired,
            "INVALID_VOUCHER_CAMPAIGN_ID" => ErrorCode::InvalidVoucherCampaignId,
            "VOUCHER_ID_DOES_NOT_EXIST" => ErrorCode::VoucherIdDoesNotExist,
            "VOUCHER_ALREADY_CLAIMED" => ErrorCode::VoucherAlreadyClaimed,
            "CAMPAIGN_MAX_EXCEEDED" => ErrorCode::CampaignMaxExceeded,
            "SINGLE_USE_VOUCHER_ALREADY_CLAIMED" => ErrorCode::SingleUseVoucherAlreadyClaimed,
            "INVALID_CAMPAIGN_DATES" => ErrorCode::InvalidCampaignDates,
            "NETWORK_ERROR" => ErrorCode::NetworkError,
            other => ErrorCode::Other(other.to_string()),
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        ErrorCode::from(code.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing text for a notice view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoticeMessage {
    pub main_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_message: Option<String>,
}

impl NoticeMessage {
    fn new(main: &str, secondary: Option<&str>) -> Self {
        Self {
            main_message: main.to_string(),
            secondary_message: secondary.map(str::to_string),
        }
    }

    pub fn default_message() -> Self {
        Self::new("Something went wrong, please try again.", None)
    }

    pub fn success() -> Self {
        Self::new(
            "Congratulations, you have successfully claimed an NFT from this event!",
            Some("We will be distributing the NFT to your Portis Wallet in a couple of days."),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip_through_strings() {
        for code in [
            "VOUCHER_ID_REQUIRED",
            "INVALID_VOUCHER_CAMPAIGN_ID",
            "VOUCHER_ID_DOES_NOT_EXIST",
            "VOUCHER_ALREADY_CLAIMED",
            "CAMPAIGN_MAX_EXCEEDED",
            "SINGLE_USE_VOUCHER_ALREADY_CLAIMED",
        ] {
            let parsed = ErrorCode::from(code);
            assert!(!matches!(parsed, ErrorCode::Other(_)), "{code} should be known");
            assert_eq!(parsed.as_str(), code);
            assert_ne!(parsed.notice(), NoticeMessage::default_message());
        }
    }

    #[test]
    fn test_unknown_code_renders_default() {
        let code = ErrorCode::from("SOMETHING_NEW");
        assert_eq!(code, ErrorCode::Other("SOMETHING_NEW".to_string()));
        let notice = code.notice();
        assert_eq!(notice.main_message, "Something went wrong, please try again.");
        assert!(notice.secondary_message.is_none());
    }

    #[test]
    fn test_error_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&ErrorCode::CampaignMaxExceeded).unwrap();
        assert_eq!(json, "\"CAMPAIGN_MAX_EXCEEDED\"");
        let back: ErrorCode = serde_json::from_str("\"weird\"").unwrap();
        assert_eq!(back, ErrorCode::Other("weird".to_string()));
    }

    #[test]
    fn test_parse_rfc3339_ms() {
        let start = parse_rfc3339_ms("2021-06-04T18:00:00Z").unwrap();
        let end = parse_rfc3339_ms(" 2021-06-04T22:00:00+02:00 ").unwrap();
        assert_eq!(end - start, 2 * 60 * 60 * 1000);
        assert!(matches!(
            parse_rfc3339_ms("yesterday"),
            Err(PromoError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_phase_serializes_like_view_names() {
        assert_eq!(serde_json::to_string(&PromoPhase::Pre).unwrap(), "\"PRE\"");
        assert_eq!(
            serde_json::to_string(&PromoPhase::LoadingCampaign).unwrap(),
            "\"LOADING_CAMPAIGN\""
        );
        assert!(PromoPhase::Success.is_terminal());
        assert!(!PromoPhase::Post.is_terminal());
    }
}
