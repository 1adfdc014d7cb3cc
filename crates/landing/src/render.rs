//! Server-side HTML for the landing page.

use promo_core::config::PageConfig;
use promo_core::NoticeMessage;
use std::fmt::Write;
use uuid::Uuid;

use crate::view::PromoView;

const STYLESHEET: &str = r#"
:root { --vh: 1vh; }
body { margin: 0; font-family: 'Work Sans', sans-serif; font-weight: 300; background: #000; color: #fff; }
.blau-wrap { min-height: calc(var(--vh) * 100); display: flex; flex-direction: column; align-items: center; justify-content: center; }
.blau-logo-wrap { padding: 2rem; }
.blau-logo { max-width: 280px; width: 70vw; }
.content-strip { width: 100%; background: #111; padding: 2rem 0; }
.strip-inner { max-width: 480px; margin: 0 auto; padding: 0 1.5rem; text-align: center; }
.promo-text { font-size: 1.1rem; line-height: 1.5; }
.promo-text.pre { margin-bottom: 0.5rem; }
.promo-date { font-size: 2.5rem; font-weight: 500; margin: 0 0 1rem; }
.promo-link { display: block; color: #fff; margin: 0.25rem 0; }
.font-black { font-weight: 500; }
.success-text { color: #7cf29c; }
.error-text { color: #ff7a7a; }
.blau-button { display: inline-block; border: 1px solid #fff; background: transparent; color: #fff; padding: 0.8rem 2.5rem; font-size: 1rem; cursor: pointer; text-decoration: none; }
.blau-spinner { width: 32px; height: 32px; margin: 1rem auto; border: 3px solid #444; border-top-color: #fff; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
"#;

pub struct PageRenderer {
    page: PageConfig,
}

impl PageRenderer {
    pub fn new(page: PageConfig) -> Self {
        Self { page }
    }

    /// Full HTML document for a session's current view.
    pub fn render(&self, session_id: Uuid, view: &PromoView) -> String {
        let mut body = String::new();
        match view {
            PromoView::Loading => body.push_str(r#"<div class="blau-spinner"></div>"#),
            PromoView::PreEvent => self.pre_event(&mut body),
            PromoView::Ongoing { claim_pending } => {
                ongoing(&mut body, session_id, *claim_pending)
            }
            PromoView::PostEvent => self.post_event(&mut body),
            PromoView::Success { message } => notice(&mut body, message, true),
            PromoView::Notice {
                message,
                retry_claim,
                ..
            } => {
                notice(&mut body, message, false);
                if *retry_claim {
                    claim_button(&mut body, session_id);
                }
            }
        }
        let refresh = view.may_change().then_some(self.page.refresh_secs);
        self.document(&body, refresh)
    }

    pub fn render_not_found(&self) -> String {
        let mut body = String::new();
        notice(&mut body, &NoticeMessage::default_message(), false);
        self.document(&body, None)
    }

    fn pre_event(&self, out: &mut String) {
        let _ = write!(
            out,
            r#"<div><p class="promo-date">{}</p><p class="promo-text pre">For updates, follow:</p>"#,
            escape(&self.page.event_date_label)
        );
        for link in &self.page.follow_links {
            let label = link
                .trim_start_matches("https://")
                .trim_start_matches("http://");
            let _ = write!(
                out,
                r#"<a href="{}" target="_blank" rel="noopener" class="promo-link">{}</a>"#,
                escape(link),
                escape(label)
            );
        }
        out.push_str("</div>");
    }

    fn post_event(&self, out: &mut String) {
        let _ = write!(
            out,
            concat!(
                r#"<p class="promo-text font-black">This event has ended.</p>"#,
                r#"<p class="promo-text">You can still create a Portis wallet to buy, sell, and hold NFTs.</p>"#,
                r#"<a href="{}" target="_blank" rel="noopener" class="blau-button">Create Wallet</a>"#,
            ),
            escape(&self.page.create_wallet_url)
        );
    }

    fn document(&self, body: &str, refresh_secs: Option<u64>) -> String {
        let refresh = refresh_secs
            .map(|secs| format!(r#"<meta http-equiv="refresh" content="{secs}">"#))
            .unwrap_or_default();
        format!(
            concat!(
                "<!DOCTYPE html>\n",
                r#"<html lang="en"><head><meta charset="utf-8">"#,
                r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
                "{refresh}",
                r#"<link rel="icon" href="{favicon}">"#,
                "<title>{title}</title>",
                r#"<link rel="preconnect" href="https://fonts.gstatic.com">"#,
                r#"<link href="https://fonts.googleapis.com/css2?family=Work+Sans:wght@300;500&display=swap" rel="stylesheet">"#,
                "<style>{style}</style></head><body>",
                r#"<div class="blau-wrap"><div class="blau-logo-wrap">"#,
                r#"<img class="blau-logo" src="{logo}" alt="{logo_alt}"></div>"#,
                r#"<div class="content-strip"><div class="strip-inner">{body}</div></div>"#,
                "</div></body></html>\n"
            ),
            refresh = refresh,
            favicon = escape(&self.page.favicon_path),
            title = escape(&self.page.title),
            style = STYLESHEET,
            logo = escape(&self.page.logo_path),
            logo_alt = escape(&self.page.logo_alt),
            body = body,
        )
    }
}

fn ongoing(out: &mut String, session_id: Uuid, claim_pending: bool) {
    out.push_str(
        r#"<p class="promo-text">NFTs will be awarded to the first 99 users to create or log into a Portis wallet.</p>"#,
    );
    if claim_pending {
        out.push_str(r#"<div class="blau-spinner"></div>"#);
    } else {
        claim_button(out, session_id);
    }
}

fn claim_button(out: &mut String, session_id: Uuid) {
    let _ = write!(
        out,
        r#"<form method="post" action="/s/{session_id}/claim"><button type="submit" class="blau-button">Claim Now</button></form>"#
    );
}

fn notice(out: &mut String, message: &NoticeMessage, is_success: bool) {
    let tone = if is_success { "success-text" } else { "error-text" };
    let _ = write!(
        out,
        r#"<p class="promo-text font-black {tone}">{}</p>"#,
        escape(&message.main_message)
    );
    if let Some(secondary) = &message.secondary_message {
        let _ = write!(out, r#"<p class="promo-text">{}</p>"#, escape(secondary));
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_core::ErrorCode;

    fn renderer() -> PageRenderer {
        PageRenderer::new(PageConfig::default())
    }

    #[test]
    fn test_ongoing_has_claim_form() {
        let id = Uuid::new_v4();
        let html = renderer().render(id, &PromoView::Ongoing { claim_pending: false });
        assert!(html.contains(&format!(r#"action="/s/{id}/claim""#)));
        assert!(html.contains("Claim Now"));
        assert!(html.contains(r#"http-equiv="refresh""#));
    }

    #[test]
    fn test_pending_claim_shows_spinner_not_button() {
        let html = renderer().render(Uuid::new_v4(), &PromoView::Ongoing { claim_pending: true });
        assert!(html.contains("blau-spinner"));
        assert!(!html.contains("Claim Now"));
    }

    #[test]
    fn test_pre_event_lists_follow_links() {
        let html = renderer().render(Uuid::new_v4(), &PromoView::PreEvent);
        assert!(html.contains("06.04.21"));
        assert!(html.contains(r#"href="https://twitter.com/3LAU""#));
        assert!(html.contains(">twitter.com/portis_io</a>"));
    }

    #[test]
    fn test_post_event_links_wallet_registration() {
        let html = renderer().render(Uuid::new_v4(), &PromoView::PostEvent);
        assert!(html.contains("This event has ended."));
        assert!(html.contains("https://wallet.portis.io/register"));
        assert!(!html.contains(r#"http-equiv="refresh""#));
    }

    #[test]
    fn test_notice_and_success_text() {
        let code = ErrorCode::CampaignMaxExceeded;
        let html = renderer().render(
            Uuid::new_v4(),
            &PromoView::Notice {
                message: code.notice(),
                code,
                retry_claim: false,
            },
        );
        assert!(html.contains("error-text"));
        assert!(html.contains("Unfortunately, all available NFTs have already been claimed."));
        assert!(!html.contains("Claim Now"));

        let html = renderer().render(
            Uuid::new_v4(),
            &PromoView::Success {
                message: NoticeMessage::success(),
            },
        );
        assert!(html.contains("success-text"));
        assert!(html.contains("Congratulations"));
    }

    #[test]
    fn test_failed_claim_notice_offers_retry() {
        let id = Uuid::new_v4();
        let html = renderer().render(
            id,
            &PromoView::Notice {
                code: ErrorCode::NetworkError,
                message: NoticeMessage::default_message(),
                retry_claim: true,
            },
        );
        assert!(html.contains("Something went wrong, please try again."));
        assert!(html.contains(&format!(r#"action="/s/{id}/claim""#)));
        assert!(html.contains(r#"http-equiv="refresh""#));
    }

    #[test]
    fn test_config_text_is_escaped() {
        let page = PageConfig {
            title: "<script>alert(1)</script>".to_string(),
            ..PageConfig::default()
        };
        let html = PageRenderer::new(page).render(Uuid::new_v4(), &PromoView::Loading);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
