//! One visitor's landing page: campaign window, phase, claim outcome.
//!
//! Every mutation goes through the session's state lock, so the tick task,
//! the campaign fetch and the claim call never interleave mid-update. Once
//! a session is unmounted, late results from any of them are dropped.

use parking_lot::Mutex;
use promo_core::{
    CampaignWindow, Clock, ErrorCode, PromoError, PromoPhase, PromoResult,
};
use promo_wallet::{WalletError, WalletProvider};
use serde::Serialize;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::poller::PollingController;
use crate::query::LandingQuery;
use crate::view::PromoView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub phase: PromoPhase,
    pub window: Option<CampaignWindow>,
    pub error: Option<ErrorCode>,
    pub claim_pending: bool,
    /// The current error came from the last claim attempt.
    pub claim_failed: bool,
    pub mounted: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            phase: PromoPhase::LoadingCampaign,
            window: None,
            error: None,
            claim_pending: false,
            claim_failed: false,
            mounted: true,
        }
    }
}

/// JSON view of a session for API clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub campaign_id: Option<String>,
    pub phase: PromoPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<CampaignWindow>,
    pub view: PromoView,
}

pub struct PromoSession {
    id: Uuid,
    query: LandingQuery,
    provider: Arc<dyn WalletProvider>,
    clock: Arc<dyn Clock>,
    state: Mutex<PageState>,
    poller: PollingController,
    last_seen: Mutex<Instant>,
}

impl fmt::Debug for PromoSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromoSession")
            .field("id", &self.id)
            .field("query", &self.query)
            .field("provider", &self.provider.name())
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl PromoSession {
    /// Create a session for `query`. Nothing runs until [`mount`](Self::mount).
    pub fn new(
        query: LandingQuery,
        provider: Arc<dyn WalletProvider>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let state = PageState {
            error: query.error_code(),
            ..PageState::default()
        };

        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let poller = PollingController::new(move || match weak.upgrade() {
                Some(session) => {
                    session.tick();
                    ControlFlow::Continue(())
                }
                None => ControlFlow::Break(()),
            });
            Self {
                id: Uuid::new_v4(),
                query,
                provider,
                clock,
                state: Mutex::new(state),
                poller,
                last_seen: Mutex::new(Instant::now()),
            }
        })
    }

    /// Start the campaign fetch and the repeating tick. Must be called from
    /// within a tokio runtime.
    pub fn mount(self: &Arc<Self>, tick_period: Duration) {
        metrics::counter!("promo.sessions_mounted").increment(1);

        if let Some(code) = self.query.error_code() {
            info!(session_id = %self.id, code = %code, "Landing query incomplete");
        } else {
            let session = Arc::clone(self);
            tokio::spawn(async move {
                session.load_campaign().await;
            });
        }

        self.poller.start(tick_period);
        debug!(session_id = %self.id, provider = self.provider.name(), "Session mounted");
    }

    /// Stop ticking and ignore any provider results still in flight.
    pub fn unmount(&self) {
        {
            let mut state = self.state.lock();
            if !state.mounted {
                return;
            }
            state.mounted = false;
        }
        self.poller.stop();
        debug!(session_id = %self.id, "Session unmounted");
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn query(&self) -> &LandingQuery {
        &self.query
    }

    pub fn state(&self) -> PageState {
        self.state.lock().clone()
    }

    pub fn phase(&self) -> PromoPhase {
        self.state.lock().phase
    }

    pub fn view(&self) -> PromoView {
        PromoView::select(&self.state.lock())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            session_id: self.id,
            campaign_id: self.query.campaign_id.clone(),
            phase: state.phase,
            window: state.window,
            view: PromoView::select(&state),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    /// Re-derive the phase from the clock. Returns the newly committed
    /// phase, or `None` when nothing changed.
    pub fn tick(&self) -> Option<PromoPhase> {
        let now = self.clock.now_ms();
        let (previous, next) = {
            let mut state = self.state.lock();
            if !state.mounted || state.phase.is_terminal() {
                return None;
            }
            let window = state.window?;
            let next = window.phase_at(now);
            if next == state.phase {
                return None;
            }
            (std::mem::replace(&mut state.phase, next), next)
        };

        info!(
            session_id = %self.id,
            from = %previous,
            to = %next,
            "Promo phase changed"
        );
        metrics::counter!("promo.phase_transitions", "to" => next.as_str()).increment(1);
        Some(next)
    }

    /// Fetch the campaign window from the provider and store it. Failures
    /// become the session's error code.
    pub async fn load_campaign(&self) {
        let Some(campaign_id) = self.query.campaign_id.as_deref() else {
            return;
        };

        let result = match self.provider.get_campaign_info(campaign_id).await {
            Ok(info) => info.window().map_err(|e| {
                warn!(campaign_id = %campaign_id, error = %e, "Campaign dates unreadable");
                ErrorCode::InvalidCampaignDates
            }),
            Err(e) => {
                warn!(campaign_id = %campaign_id, error = %e, "Campaign info fetch failed");
                Err(e.error_code())
            }
        };

        let mut state = self.state.lock();
        if !state.mounted {
            debug!(session_id = %self.id, "Campaign info arrived after unmount");
            return;
        }
        match result {
            Ok(window) => {
                debug!(
                    session_id = %self.id,
                    start_ms = window.start_ms,
                    end_ms = window.end_ms,
                    "Campaign window loaded"
                );
                state.window = Some(window);
            }
            Err(code) => {
                metrics::counter!("promo.campaign_fetch_errors").increment(1);
                state.error.get_or_insert(code);
            }
        }
    }

    /// Claim the voucher and wait for the provider's answer.
    pub async fn claim(&self) -> PromoResult<PromoView> {
        let voucher_id = self.begin_claim()?;
        let result = self.provider.claim_voucher(&voucher_id).await;
        self.finish_claim(result);
        Ok(self.view())
    }

    /// Claim the voucher in the background. The pending state is visible
    /// as soon as this returns.
    pub fn spawn_claim(self: &Arc<Self>) -> PromoResult<()> {
        let voucher_id = self.begin_claim()?;
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let result = session.provider.claim_voucher(&voucher_id).await;
            session.finish_claim(result);
        });
        Ok(())
    }

    fn begin_claim(&self) -> PromoResult<String> {
        let mut state = self.state.lock();
        if !state.mounted {
            return Err(PromoError::ClaimUnavailable("session is closed".to_string()));
        }
        if state.claim_pending {
            return Err(PromoError::ClaimUnavailable(
                "a claim is already in progress".to_string(),
            ));
        }
        if state.phase != PromoPhase::Ongoing {
            return Err(PromoError::ClaimUnavailable(format!(
                "campaign phase is {}",
                state.phase
            )));
        }
        let voucher_id = self
            .query
            .voucher_id
            .clone()
            .ok_or_else(|| PromoError::ClaimUnavailable("no voucher id".to_string()))?;

        state.claim_pending = true;
        // Re-clicking after a failed claim is the retry path.
        state.error = None;
        state.claim_failed = false;
        info!(session_id = %self.id, voucher_id = %voucher_id, "Claiming voucher");
        Ok(voucher_id)
    }

    fn finish_claim(&self, result: Result<(), WalletError>) {
        let mut state = self.state.lock();
        if !state.mounted {
            debug!(session_id = %self.id, "Claim result arrived after unmount");
            return;
        }
        state.claim_pending = false;
        // Only a non-empty code counts as a failed claim.
        let result = match result {
            Err(e) if e.is_blank_rejection() => Ok(()),
            other => other,
        };
        match result {
            Ok(()) => {
                state.phase = PromoPhase::Success;
                metrics::counter!("promo.claims").increment(1);
                info!(session_id = %self.id, "Voucher claimed");
            }
            Err(e) => {
                let code = e.error_code();
                metrics::counter!("promo.claim_errors", "code" => code.as_str().to_string())
                    .increment(1);
                warn!(session_id = %self.id, code = %code, error = %e, "Voucher claim failed");
                state.error = Some(code);
                state.claim_failed = true;
            }
        }
    }
}
