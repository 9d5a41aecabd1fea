//! End-to-end tests: the router with the request filter chain in front.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt;

use authchain::{
    app::build_router,
    config::Config,
    filter::{Decision, Filter, FilterChain, FilterError, Priority, RequestContext},
    services::auth::build_filter_chain,
    state::AppState,
};

const ALICE: &str = "t-alice";
const BOB: &str = "t-bob";
// carol:s3cret
const CAROL_BASIC: &str = "Basic Y2Fyb2w6czNjcmV0";

fn config(extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("AUTH_REALM", "test-realm"),
        ("AUTH_TOKENS", "t-alice:alice:admin|user,t-bob:bob:user"),
        ("AUTH_BASIC_USERS", "carol:s3cret:user"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_vars(|key| vars.get(key).cloned()).unwrap()
}

fn app(extra: &[(&str, &str)]) -> Router {
    let config = config(extra);
    let state = AppState::new(build_filter_chain(&config).unwrap());
    build_router(state, &config)
}

/// Router around a hand-built chain instead of the configured one.
fn app_with(filter: impl Filter + 'static, extra: &[(&str, &str)]) -> Router {
    let chain = FilterChain::builder()
        .register(filter, Priority::USER)
        .build()
        .unwrap();
    build_router(AppState::new(Arc::new(chain)), &config(extra))
}

/// Fails every request with a backend error.
struct Broken;

#[async_trait]
impl Filter for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    async fn apply(&self, _ctx: &mut RequestContext) -> Result<Decision, FilterError> {
        Err(FilterError::with_source(
            "credential store unreachable",
            std::io::Error::other("connection refused by 10.0.0.7"),
        ))
    }
}

/// Takes longer than any configured request timeout in these tests.
struct Stalled;

#[async_trait]
impl Filter for Stalled {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn apply(&self, _ctx: &mut RequestContext) -> Result<Decision, FilterError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Decision::Continue)
    }
}

async fn get(app: Router, uri: &str, authorization: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = get(app(&[]), "/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(json(response).await["status"], "ok");
}

#[tokio::test]
async fn me_requires_credentials() {
    let response = get(app(&[]), "/api/v1/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[header::WWW_AUTHENTICATE],
        "Bearer realm=\"test-realm\""
    );
    assert_eq!(json(response).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn me_with_bearer_token() {
    let response = get(app(&[]), "/api/v1/me", Some("Bearer t-alice")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["principal"], "alice");
    assert_eq!(body["scheme"], "Bearer");
    assert_eq!(body["roles"], serde_json::json!(["admin", "user"]));
}

#[tokio::test]
async fn me_with_access_token_query() {
    let uri = format!("/api/v1/me?access_token={BOB}");
    let response = get(app(&[]), &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["principal"], "bob");
}

#[tokio::test]
async fn me_with_basic_credentials() {
    let response = get(app(&[]), "/api/v1/me", Some(CAROL_BASIC)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["principal"], "carol");
    assert_eq!(body["scheme"], "Basic");
}

#[tokio::test]
async fn unknown_token_is_rejected_even_on_permit_all_route() {
    let response = get(app(&[]), "/api/v1/greeting", Some("Bearer t-eve")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_requires_admin_role() {
    let response = get(app(&[]), "/api/v1/admin", Some(format!("Bearer {BOB}").as_str())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json(response).await["error"]["code"], "FORBIDDEN");

    let response = get(app(&[]), "/api/v1/admin", Some(format!("Bearer {ALICE}").as_str())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["principal"], "alice");
}

#[tokio::test]
async fn greeting_has_optional_principal() {
    let response = get(app(&[]), "/api/v1/greeting", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["message"], "hello, anonymous");
    assert_eq!(body["authenticated"], false);

    let response = get(app(&[]), "/api/v1/greeting", Some("Bearer t-alice")).await;
    let body = json(response).await;
    assert_eq!(body["message"], "hello, alice");
    assert_eq!(body["authenticated"], true);
}

#[tokio::test]
async fn required_mode_rejects_anonymous_greeting() {
    let app = app(&[("AUTH_MODE", "required")]);
    let response = get(app, "/api/v1/greeting", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn filter_failure_is_an_opaque_internal_error() {
    let response = get(app_with(Broken, &[]), "/api/v1/me", Some("Bearer t-alice")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!text.contains("credential store"));
    assert!(!text.contains("10.0.0.7"));
    assert!(!text.contains("broken"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(body["error"]["message"], "internal server error");
}

#[tokio::test]
async fn public_routes_skip_a_failing_chain() {
    let response = get(app_with(Broken, &[]), "/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = app(&[("REQUEST_BODY_LIMIT_BYTES", "16")]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/greeting")
        .header(header::CONTENT_LENGTH, "64")
        .body(Body::from(vec![b'x'; 64]))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn slow_request_times_out() {
    let app = app_with(Stalled, &[("REQUEST_TIMEOUT_SECS", "1")]);
    let response = get(app, "/api/v1/greeting", None).await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}
