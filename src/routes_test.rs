use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::*;
use crate::roles::Role;
use crate::store::AccessPolicy;
use crate::test_support::{FakeIdentity, MemoryDirectory, RecordingAnalytics, record};

fn test_app(records: Vec<crate::services::directory::AuthorizationRecord>) -> App {
    let app = App::new(
        Arc::new(FakeIdentity::new()),
        Arc::new(MemoryDirectory::with(records)),
        Arc::new(RecordingAnalytics::default()),
        AccessPolicy::default(),
    );
    let _listener = app.spawn_auth_listener();
    app
}

async fn get(state: &App, uri: &str) -> Response {
    app(state.clone())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn json(resp: Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn healthz_ok() {
    let state = test_app(vec![]);
    assert_eq!(get(&state, "/healthz").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_root_renders_login_view() {
    let state = test_app(vec![]);
    let resp = get(&state, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json(resp).await;
    assert_eq!(body["view"], "login");
    assert_eq!(body["location"]["full_path"], "/");
    assert!(body["user"].is_null());
    assert_eq!(body["loading"], false);
}

#[tokio::test]
async fn anonymous_protected_page_redirects_home() {
    let state = test_app(vec![]);
    let resp = get(&state, "/student").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn unknown_page_renders_not_found_view() {
    let state = test_app(vec![]);
    let body = json(get(&state, "/missing?x=1").await).await;
    assert_eq!(body["view"], "not_found");
    assert_eq!(body["location"]["full_path"], "/missing?x=1");
}

// =============================================================================
// Auth flow
// =============================================================================

#[tokio::test]
async fn login_redirects_to_provider() {
    let state = test_app(vec![]);
    let resp = get(&state, "/auth/login").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "https://idp.test/authorize?state=ok");
}

#[tokio::test]
async fn callback_signs_in_and_lands_on_role_view() {
    let email = "inst@miamioh.edu";
    let state = test_app(vec![record(email, Role::Instructor)]);
    state.store.settled().await;

    let resp = get(&state, &format!("/auth/callback?code={email}&state=ok")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/instructor");

    let body = json(get(&state, "/instructor").await).await;
    assert_eq!(body["view"], "instructor");
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["toasts"][0]["message"], "Welcome back, Test User");

    let resp = get(&state, "/director").await;
    assert_eq!(location(&resp), "/instructor");
}

#[tokio::test]
async fn callback_with_provider_error_reports_and_returns_home() {
    let state = test_app(vec![]);
    state.store.settled().await;

    let resp = get(&state, "/auth/callback?error=access_denied").await;
    assert_eq!(location(&resp), "/");
    assert!(!state.store.state().loading);

    let body = json(get(&state, "/").await).await;
    assert_eq!(body["toasts"][0]["message"], LOGIN_FAILED);
    assert_eq!(body["toasts"][0]["level"], "error");
}

#[tokio::test]
async fn callback_with_bad_state_is_rejected() {
    let state = test_app(vec![record("a@miamioh.edu", Role::Student)]);
    state.store.settled().await;

    let resp = get(&state, "/auth/callback?code=a@miamioh.edu&state=forged").await;
    assert_eq!(location(&resp), "/");
    assert!(state.store.state().user().is_none());
}

#[tokio::test]
async fn logout_returns_home_signed_out() {
    let email = "s@miamioh.edu";
    let state = test_app(vec![record(email, Role::Student)]);
    state.store.settled().await;
    get(&state, &format!("/auth/callback?code={email}&state=ok")).await;

    let resp = app(state.clone())
        .oneshot(Request::post("/auth/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(location(&resp), "/");
    assert!(state.store.state().user().is_none());
    assert_eq!(state.router.current().path, "/");
}
