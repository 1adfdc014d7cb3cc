//! Time-based promo phase derivation.

use crate::types::{CampaignWindow, PromoPhase};

/// Map the current time onto the campaign window.
///
/// Only `Pre`, `Ongoing` and `Post` are ever returned. Both boundary
/// instants (`now == start`, `now == end`) belong to `Ongoing`.
pub fn derive_phase(now_ms: i64, start_ms: i64, end_ms: i64) -> PromoPhase {
    if now_ms < start_ms {
        PromoPhase::Pre
    } else if now_ms > end_ms {
        PromoPhase::Post
    } else {
        PromoPhase::Ongoing
    }
}

impl CampaignWindow {
    pub fn phase_at(&self, now_ms: i64) -> PromoPhase {
        derive_phase(now_ms, self.start_ms, self.end_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_622_829_600_000;

    #[test]
    fn test_before_start_is_pre() {
        assert_eq!(derive_phase(T - 1, T, T + 1000), PromoPhase::Pre);
        assert_eq!(derive_phase(i64::MIN, T, T + 1000), PromoPhase::Pre);
    }

    #[test]
    fn test_after_end_is_post() {
        assert_eq!(derive_phase(T + 1001, T, T + 1000), PromoPhase::Post);
        assert_eq!(derive_phase(i64::MAX, T, T + 1000), PromoPhase::Post);
    }

    #[test]
    fn test_inside_window_is_ongoing() {
        assert_eq!(derive_phase(T + 500, T, T + 1000), PromoPhase::Ongoing);
    }

    #[test]
    fn test_boundaries_are_ongoing() {
        assert_eq!(derive_phase(T, T, T + 1000), PromoPhase::Ongoing);
        assert_eq!(derive_phase(T + 1000, T, T + 1000), PromoPhase::Ongoing);
    }

    #[test]
    fn test_inverted_window_never_ongoing_between() {
        // start after end: PRE before start, POST from start on.
        assert_eq!(derive_phase(T + 500, T + 1000, T), PromoPhase::Pre);
        assert_eq!(derive_phase(T + 2000, T + 1000, T), PromoPhase::Post);
    }

    #[test]
    fn test_window_phase_at() {
        let window = CampaignWindow::new(T, T + 1000);
        let phases: Vec<_> = [T - 10, T, T + 999, T + 1000, T + 1001]
            .iter()
            .map(|&now| window.phase_at(now))
            .collect();
        assert_eq!(
            phases,
            vec![
                PromoPhase::Pre,
                PromoPhase::Ongoing,
                PromoPhase::Ongoing,
                PromoPhase::Ongoing,
                PromoPhase::Post,
            ]
        );
    }
}
