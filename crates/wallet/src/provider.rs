use async_trait::async_trait;
use promo_core::types::parse_rfc3339_ms;
use promo_core::{CampaignWindow, PromoResult};
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Operations the landing page needs from the wallet provider.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn get_campaign_info(&self, campaign_id: &str) -> Result<CampaignInfo, WalletError>;

    /// Claim the voucher for the visitor. `Ok` means the claim was accepted.
    async fn claim_voucher(&self, voucher_id: &str) -> Result<(), WalletError>;

    fn name(&self) -> &str;
}

/// A campaign date as sent by the provider: an ISO-8601 string or epoch
/// milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CampaignDate {
    Millis(i64),
    Text(String),
}

impl CampaignDate {
    fn to_millis(&self) -> PromoResult<i64> {
        match self {
            CampaignDate::Millis(ms) => Ok(*ms),
            CampaignDate::Text(text) => {
                // Some provider deployments send millis as a string.
                if let Ok(ms) = text.trim().parse::<i64>() {
                    return Ok(ms);
                }
                parse_rfc3339_ms(text)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInfo {
    pub campaign_date_start: CampaignDate,
    pub campaign_date_end: CampaignDate,
}

impl CampaignInfo {
    pub fn from_window(window: CampaignWindow) -> Self {
        Self {
            campaign_date_start: CampaignDate::Millis(window.start_ms),
            campaign_date_end: CampaignDate::Millis(window.end_ms),
        }
    }

    pub fn window(&self) -> PromoResult<CampaignWindow> {
        Ok(CampaignWindow::new(
            self.campaign_date_start.to_millis()?,
            self.campaign_date_end.to_millis()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_core::PromoError;

    #[test]
    fn test_parse_string_dates() {
        let info: CampaignInfo = serde_json::from_str(
            r#"{"campaignDateStart": "2021-06-04T18:00:00.000Z", "campaignDateEnd": "2021-06-04T19:00:00.000Z"}"#,
        )
        .unwrap();
        let window = info.window().unwrap();
        assert_eq!(window.end_ms - window.start_ms, 3_600_000);
    }

    #[test]
    fn test_parse_numeric_dates() {
        let info: CampaignInfo =
            serde_json::from_str(r#"{"campaignDateStart": 1000, "campaignDateEnd": "2000"}"#)
                .unwrap();
        assert_eq!(info.window().unwrap(), CampaignWindow::new(1000, 2000));
    }

    #[test]
    fn test_garbage_date_is_invalid_window() {
        let info = CampaignInfo {
            campaign_date_start: CampaignDate::Text("soon".to_string()),
            campaign_date_end: CampaignDate::Millis(0),
        };
        assert!(matches!(info.window(), Err(PromoError::InvalidWindow(_))));
    }
}
