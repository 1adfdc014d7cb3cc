//! URL query parameters the landing page is opened with.

use promo_core::ErrorCode;
use serde::{Deserialize, Serialize};

/// `campaignId` and `voucherId` as read from the QR code URL. Empty values
/// count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LandingQuery {
    pub campaign_id: Option<String>,
    pub voucher_id: Option<String>,
}

impl LandingQuery {
    pub fn new(campaign_id: Option<&str>, voucher_id: Option<&str>) -> Self {
        Self {
            campaign_id: non_empty(campaign_id),
            voucher_id: non_empty(voucher_id),
        }
    }

    /// Build from raw key/value pairs. When a key repeats, the first
    /// non-empty occurrence wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "campaignId" => &mut query.campaign_id,
                "voucherId" => &mut query.voucher_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = non_empty(Some(value.as_ref()));
            }
        }
        query
    }

    /// Error to show before anything is fetched, if the URL is incomplete.
    pub fn error_code(&self) -> Option<ErrorCode> {
        if self.voucher_id.is_none() {
            return Some(ErrorCode::VoucherIdRequired);
        }
        if self.campaign_id.is_none() {
            return Some(ErrorCode::InvalidVoucherCampaignId);
        }
        None
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
