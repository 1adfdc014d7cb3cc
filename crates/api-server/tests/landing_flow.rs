//! End-to-end landing flow through the HTTP router, with an in-memory
//! wallet provider and a hand-driven clock.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use promo_api::ApiServer;
use promo_core::config::AppConfig;
use promo_core::{CampaignWindow, ManualClock};
use promo_landing_page::SessionRegistry;
use promo_wallet::InMemoryWalletProvider;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const T: i64 = 1_622_829_600_000;

struct Harness {
    app: Router,
    clock: ManualClock,
    provider: Arc<InMemoryWalletProvider>,
}

fn harness(now: i64) -> Harness {
    let config = AppConfig::default();
    let provider = Arc::new(InMemoryWalletProvider::new());
    provider.add_campaign("blau", CampaignWindow::new(T, T + 1000));
    provider.add_voucher("v-1");
    let clock = ManualClock::new(now);

    let registry = Arc::new(SessionRegistry::new(
        provider.clone(),
        Arc::new(clock.clone()),
        &config.polling,
        &config.session,
    ));
    let app = ApiServer::new(config, registry).router();
    Harness {
        app,
        clock,
        provider,
    }
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, location, String::from_utf8(body.to_vec()).unwrap())
}

async fn open(app: &Router, uri: &str) -> String {
    let (status, location, _) = send(app, Method::GET, uri).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    location.expect("landing redirects to the session page")
}

#[tokio::test(start_paused = true)]
async fn test_claim_flow_ends_in_sticky_success() {
    let h = harness(T + 500);
    let page = open(&h.app, "/?campaignId=blau&voucherId=v-1").await;
    assert!(page.starts_with("/s/"));

    let (_, _, html) = send(&h.app, Method::GET, &page).await;
    assert!(html.contains("blau-spinner"), "loading before the first tick");

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (status, _, html) = send(&h.app, Method::GET, &page).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Claim Now"));

    let (status, location, _) = send(&h.app, Method::POST, &format!("{page}/claim")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some(page.as_str()));

    tokio::time::sleep(Duration::from_millis(10)).await;
    let (_, _, html) = send(&h.app, Method::GET, &page).await;
    assert!(html.contains("Congratulations, you have successfully claimed an NFT"));
    assert!(h.provider.is_claimed("v-1"));

    h.clock.set(T + 2000);
    tokio::time::sleep(Duration::from_secs(3)).await;
    let id = page.trim_start_matches("/s/");
    let (_, _, json) = send(&h.app, Method::GET, &format!("/v1/sessions/{id}")).await;
    let json: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(json["phase"], "SUCCESS");
    assert_eq!(json["view"]["view"], "SUCCESS");
}

#[tokio::test(start_paused = true)]
async fn test_missing_ids_show_notices() {
    let h = harness(T + 500);

    let page = open(&h.app, "/").await;
    let (_, _, html) = send(&h.app, Method::GET, &page).await;
    assert!(html.contains("Scan a QR code to claim!"));

    let page = open(&h.app, "/?voucherId=v-1").await;
    let (_, _, html) = send(&h.app, Method::GET, &page).await;
    assert!(html.contains("This QR code is not linked to a valid campaign."));

    assert_eq!(h.provider.campaign_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_json_claim_before_start_conflicts() {
    let h = harness(T - 60_000);
    let page = open(&h.app, "/?campaignId=blau&voucherId=v-1").await;
    let id = page.trim_start_matches("/s/");

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (_, _, html) = send(&h.app, Method::GET, &page).await;
    assert!(html.contains("For updates, follow:"));

    let (status, _, body) =
        send(&h.app, Method::POST, &format!("/v1/sessions/{id}/claim")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("claim_unavailable"));
    assert_eq!(h.provider.claim_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_campaign_fetch_failure_shows_notice() {
    let h = harness(T + 500);
    h.provider.set_unavailable(true);
    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/sessions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"campaignId":"blau","voucherId":"v-1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let id = json["session_id"].as_str().unwrap().to_string();

    // Campaign fetch failed, so the notice replaces every other view.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (_, _, body) = send(&h.app, Method::GET, &format!("/v1/sessions/{id}")).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["view"]["view"], "NOTICE");
    assert_eq!(json["view"]["code"], "NETWORK_ERROR");
    assert_eq!(
        json["view"]["message"]["main_message"],
        "Something went wrong, please try again."
    );
}

#[tokio::test(start_paused = true)]
async fn test_json_claim_failure_returns_notice() {
    let h = harness(T + 500);
    let page = open(&h.app, "/?campaignId=blau&voucherId=v-1").await;
    let id = page.trim_start_matches("/s/");
    tokio::time::sleep(Duration::from_millis(1100)).await;

    h.provider.set_unavailable(true);
    let (status, _, body) =
        send(&h.app, Method::POST, &format!("/v1/sessions/{id}/claim")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["phase"], "ONGOING");
    assert_eq!(json["view"]["view"], "NOTICE");
    assert_eq!(json["view"]["code"], "NETWORK_ERROR");
    assert_eq!(json["view"]["retry_claim"], true);
    assert_eq!(h.provider.claim_calls(), 1);
    assert!(!h.provider.is_claimed("v-1"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_html_claim_can_be_retried() {
    let h = harness(T + 500);
    let page = open(&h.app, "/?campaignId=blau&voucherId=v-1").await;
    tokio::time::sleep(Duration::from_millis(1100)).await;

    h.provider.set_unavailable(true);
    let (status, _, _) = send(&h.app, Method::POST, &format!("{page}/claim")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    tokio::time::sleep(Duration::from_millis(10)).await;

    let (_, _, html) = send(&h.app, Method::GET, &page).await;
    assert!(html.contains("Something went wrong, please try again."));
    assert!(html.contains("Claim Now"));
    assert!(html.contains(&format!(r#"action="{page}/claim""#)));
    assert!(html.contains(r#"http-equiv="refresh""#));

    h.provider.set_unavailable(false);
    send(&h.app, Method::POST, &format!("{page}/claim")).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let (_, _, html) = send(&h.app, Method::GET, &page).await;
    assert!(html.contains("Congratulations, you have successfully claimed an NFT"));
    assert!(!html.contains("Claim Now"));
    assert!(h.provider.is_claimed("v-1"));
}

#[tokio::test(start_paused = true)]
async fn test_delete_unmounts_session() {
    let h = harness(T + 500);
    let page = open(&h.app, "/?campaignId=blau&voucherId=v-1").await;
    let id = page.trim_start_matches("/s/");

    let (status, _, _) = send(&h.app, Method::DELETE, &format!("/v1/sessions/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&h.app, Method::DELETE, &format!("/v1/sessions/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, html) = send(&h.app, Method::GET, &page).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Something went wrong, please try again."));
}

#[tokio::test]
async fn test_health_reports_sessions() {
    let h = harness(T);
    open(&h.app, "/?campaignId=blau&voucherId=v-1").await;

    let (status, _, body) = send(&h.app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["active_sessions"], 1);
    assert_eq!(json["provider"], "in-memory");

    let (status, _, _) = send(&h.app, Method::GET, "/live").await;
    assert_eq!(status, StatusCode::OK);
}
