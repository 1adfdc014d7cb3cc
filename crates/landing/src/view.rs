use promo_core::{ErrorCode, NoticeMessage, PromoPhase};
use serde::Serialize;

use crate::session::PageState;

/// What the landing page shows right now. Exactly one view is active.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "view", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoView {
    Loading,
    PreEvent,
    Ongoing { claim_pending: bool },
    PostEvent,
    Success { message: NoticeMessage },
    Notice {
        code: ErrorCode,
        message: NoticeMessage,
        /// A failed claim can be retried while the campaign is still on.
        retry_claim: bool,
    },
}

impl PromoView {
    /// An error always wins; after that SUCCESS, then the time-based phase.
    pub fn select(state: &PageState) -> Self {
        if let Some(code) = &state.error {
            return PromoView::Notice {
                code: code.clone(),
                message: code.notice(),
                retry_claim: state.claim_failed && state.phase == PromoPhase::Ongoing,
            };
        }
        match state.phase {
            PromoPhase::Success => PromoView::Success {
                message: NoticeMessage::success(),
            },
            PromoPhase::Ongoing => PromoView::Ongoing {
                claim_pending: state.claim_pending,
            },
            PromoPhase::Post => PromoView::PostEvent,
            PromoPhase::Pre => PromoView::PreEvent,
            PromoPhase::LoadingCampaign => PromoView::Loading,
        }
    }

    /// Whether waiting can still change what is shown without the visitor
    /// doing anything.
    pub fn may_change(&self) -> bool {
        matches!(
            self,
            PromoView::Loading
                | PromoView::PreEvent
                | PromoView::Ongoing { .. }
                | PromoView::Notice {
                    retry_claim: true,
                    ..
                }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            PromoView::Loading => "LOADING",
            PromoView::PreEvent => "PRE_EVENT",
            PromoView::Ongoing { .. } => "ONGOING",
            PromoView::PostEvent => "POST_EVENT",
            PromoView::Success { .. } => "SUCCESS",
            PromoView::Notice { .. } => "NOTICE",
        }
    }
}
