//! Live page sessions, keyed by session id.

use dashmap::DashMap;
use promo_core::config::{PollingConfig, SessionConfig};
use promo_core::{Clock, PromoError, PromoResult};
use promo_wallet::WalletProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::query::LandingQuery;
use crate::session::PromoSession;

/// Holds every mounted session and hands each one the shared provider
/// and clock.
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<PromoSession>>,
    provider: Arc<dyn WalletProvider>,
    clock: Arc<dyn Clock>,
    tick_period: Duration,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        clock: Arc<dyn Clock>,
        polling: &PollingConfig,
        session: &SessionConfig,
    ) -> Self {
        info!(
            provider = provider.name(),
            tick_ms = polling.tick_interval_ms,
            idle_ttl_secs = session.idle_ttl_secs,
            max_sessions = session.max_sessions,
            "Session registry initialized"
        );
        Self {
            sessions: DashMap::new(),
            provider,
            clock,
            tick_period: Duration::from_millis(polling.tick_interval_ms),
            idle_ttl: Duration::from_secs(session.idle_ttl_secs),
            max_sessions: session.max_sessions,
        }
    }

    /// Create and mount a session for a landing page visit.
    pub fn mount(&self, query: LandingQuery) -> PromoResult<Arc<PromoSession>> {
        if self.sessions.len() >= self.max_sessions {
            self.evict_idle();
            if self.sessions.len() >= self.max_sessions {
                metrics::counter!("promo.sessions_rejected").increment(1);
                return Err(PromoError::SessionCapacity(self.max_sessions));
            }
        }

        let session = PromoSession::new(query, self.provider.clone(), self.clock.clone());
        session.mount(self.tick_period);
        self.sessions.insert(session.id(), session.clone());
        debug!(session_id = %session.id(), active = self.sessions.len(), "Session registered");
        Ok(session)
    }

    /// Look up a session and mark it as recently used.
    pub fn get(&self, id: &Uuid) -> PromoResult<Arc<PromoSession>> {
        let session = self
            .sessions
            .get(id)
            .map(|s| s.value().clone())
            .ok_or_else(|| PromoError::SessionNotFound(id.to_string()))?;
        session.touch();
        Ok(session)
    }

    /// Unmount and forget a session. Returns false if it was not present.
    pub fn unmount(&self, id: &Uuid) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.unmount();
                true
            }
            None => false,
        }
    }

    /// Unmount sessions nobody has looked at for longer than the idle TTL.
    /// Call this periodically from a background task.
    pub fn evict_idle(&self) -> usize {
        let before = self.sessions.len();
        let ttl = self.idle_ttl;
        self.sessions.retain(|_, session| {
            if session.idle_for() > ttl {
                session.unmount();
                false
            } else {
                true
            }
        });
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            info!(evicted, remaining = self.sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Unmount everything, e.g. on shutdown.
    pub fn unmount_all(&self) {
        self.sessions.retain(|_, session| {
            session.unmount();
            false
        });
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
