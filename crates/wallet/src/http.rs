//! HTTP client for the hosted wallet provider.

use async_trait::async_trait;
use promo_core::config::WalletConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::WalletError;
use crate::provider::{CampaignInfo, WalletProvider};

/// Response envelope used by every provider endpoint: a `result`, an
/// `error`, or (for claims) an empty object meaning success.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<ProviderErrorBody>,
}

/// Provider errors arrive either as a bare code or as an object with a
/// `code` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderErrorBody {
    Code(String),
    Detailed {
        code: String,
        #[serde(default)]
        message: Option<String>,
    },
}

impl ProviderErrorBody {
    fn code(&self) -> &str {
        match self {
            ProviderErrorBody::Code(code) | ProviderErrorBody::Detailed { code, .. } => code,
        }
    }

    fn into_error(self) -> WalletError {
        match self {
            ProviderErrorBody::Code(code) => WalletError::Rejected { code },
            ProviderErrorBody::Detailed { code, message } => {
                if let Some(message) = message {
                    debug!(code = %code, message = %message, "Provider error detail");
                }
                WalletError::Rejected { code }
            }
        }
    }
}

/// Wraps `reqwest::Client` with the provider's base URL and DApp identity.
#[derive(Clone)]
pub struct HttpWalletProvider {
    http: reqwest::Client,
    base_url: Url,
    app_id: String,
    network: String,
}

impl HttpWalletProvider {
    pub fn new(config: &WalletConfig) -> Result<Self, WalletError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| WalletError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: Url::parse(&config.base_url)?,
            app_id: config.app_id.clone(),
            network: config.network.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append escaped path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, WalletError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                WalletError::Transport(format!("base URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Envelope<T>, WalletError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WalletError::Transport(format!("failed to read response: {e}")))?;

        // Error bodies are honoured regardless of status so the provider's
        // code reaches the visitor.
        let mut envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(WalletError::InvalidResponse(format!("{e}")));
            }
            Err(_) => {
                return Err(WalletError::Transport(format!("provider returned HTTP {status}")));
            }
        };

        // A blank code is not an error.
        if let Some(error) = envelope.error.take() {
            if !error.code().trim().is_empty() {
                return Err(error.into_error());
            }
        }
        if !status.is_success() {
            return Err(WalletError::Transport(format!("provider returned HTTP {status}")));
        }
        Ok(envelope)
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn get_campaign_info(&self, campaign_id: &str) -> Result<CampaignInfo, WalletError> {
        let url = self.endpoint(&["campaigns", campaign_id])?;
        debug!(url = %url, "Fetching campaign info");

        let response = self
            .http
            .get(url)
            .query(&[("appId", self.app_id.as_str()), ("network", self.network.as_str())])
            .send()
            .await
            .map_err(|e| WalletError::Transport(format!("request failed: {e}")))?;

        let envelope: Envelope<CampaignInfo> = Self::read_envelope(response).await?;
        envelope.result.ok_or_else(|| {
            warn!(campaign_id = %campaign_id, "Campaign info response had no result");
            WalletError::InvalidResponse("missing result".to_string())
        })
    }

    async fn claim_voucher(&self, voucher_id: &str) -> Result<(), WalletError> {
        let url = self.endpoint(&["vouchers", voucher_id, "claim"])?;
        debug!(url = %url, "Claiming voucher");

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({
                "appId": self.app_id,
                "network": self.network,
            }))
            .send()
            .await
            .map_err(|e| WalletError::Transport(format!("request failed: {e}")))?;

        let _: Envelope<serde_json::Value> = Self::read_envelope(response).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}
