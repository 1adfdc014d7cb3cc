//! In-process wallet provider used for demos and as a test double.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use promo_core::CampaignWindow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

use crate::error::WalletError;
use crate::provider::{CampaignInfo, WalletProvider};

pub struct InMemoryWalletProvider {
    campaigns: DashMap<String, CampaignInfo>,
    /// voucher id -> already claimed
    vouchers: DashMap<String, bool>,
    unavailable: AtomicBool,
    claim_delay: Mutex<Duration>,
    campaign_calls: AtomicU64,
    claim_calls: AtomicU64,
}

impl InMemoryWalletProvider {
    pub fn new() -> Self {
        Self {
            campaigns: DashMap::new(),
            vouchers: DashMap::new(),
            unavailable: AtomicBool::new(false),
            claim_delay: Mutex::new(Duration::ZERO),
            campaign_calls: AtomicU64::new(0),
            claim_calls: AtomicU64::new(0),
        }
    }

    /// A provider with one campaign `demo` running for an hour from `now_ms`
    /// and vouchers `demo-1` through `demo-99`.
    pub fn demo(now_ms: i64) -> Self {
        let provider = Self::new();
        provider.add_campaign("demo", CampaignWindow::new(now_ms, now_ms + 3_600_000));
        for n in 1..=99 {
            provider.add_voucher(&format!("demo-{n}"));
        }
        info!(vouchers = 99, "Seeded demo campaign");
        provider
    }

    pub fn add_campaign(&self, campaign_id: &str, window: CampaignWindow) {
        self.campaigns
            .insert(campaign_id.to_string(), CampaignInfo::from_window(window));
    }

    pub fn add_campaign_info(&self, campaign_id: &str, info: CampaignInfo) {
        self.campaigns.insert(campaign_id.to_string(), info);
    }

    pub fn add_voucher(&self, voucher_id: &str) {
        self.vouchers.insert(voucher_id.to_string(), false);
    }

    /// Make every call fail as if the provider were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_claim_delay(&self, delay: Duration) {
        *self.claim_delay.lock() = delay;
    }

    pub fn is_claimed(&self, voucher_id: &str) -> bool {
        self.vouchers.get(voucher_id).map(|v| *v).unwrap_or(false)
    }

    pub fn campaign_calls(&self) -> u64 {
        self.campaign_calls.load(Ordering::SeqCst)
    }

    pub fn claim_calls(&self) -> u64 {
        self.claim_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), WalletError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(WalletError::Transport("provider unavailable".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for InMemoryWalletProvider {
    async fn get_campaign_info(&self, campaign_id: &str) -> Result<CampaignInfo, WalletError> {
        self.campaign_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.campaigns
            .get(campaign_id)
            .map(|c| c.clone())
            .ok_or_else(|| WalletError::Rejected {
                code: "INVALID_VOUCHER_CAMPAIGN_ID".to_string(),
            })
    }

    async fn claim_voucher(&self, voucher_id: &str) -> Result<(), WalletError> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.claim_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.check_available()?;

        let mut claimed = self
            .vouchers
            .get_mut(voucher_id)
            .ok_or_else(|| WalletError::Rejected {
                code: "VOUCHER_ID_DOES_NOT_EXIST".to_string(),
            })?;
        if *claimed {
            return Err(WalletError::Rejected {
                code: "SINGLE_USE_VOUCHER_ALREADY_CLAIMED".to_string(),
            });
        }
        *claimed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
