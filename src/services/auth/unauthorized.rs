//! 401 responses with a `WWW-Authenticate` challenge.
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;

pub trait UnauthorizedHandler: Send + Sync {
    fn build_response(&self, scheme: &str, realm: &str) -> Response;
}

fn challenge(scheme: &str, realm: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("{scheme} realm=\"{realm}\"")).ok()
}

fn with_challenge(mut response: Response, scheme: &str, realm: &str) -> Response {
    match challenge(scheme, realm) {
        Some(value) => {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }
        None => tracing::warn!(realm, "realm is not a valid header value; challenge omitted"),
    }
    response
}

/// Plain-text 401.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUnauthorizedHandler;

impl DefaultUnauthorizedHandler {
    pub const BODY: &'static str = "Credentials are required to access this resource.";
}

impl UnauthorizedHandler for DefaultUnauthorizedHandler {
    fn build_response(&self, scheme: &str, realm: &str) -> Response {
        let response = (
            StatusCode::UNAUTHORIZED,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            Self::BODY,
        )
            .into_response();
        with_challenge(response, scheme, realm)
    }
}

/// 401 in the service's JSON error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonUnauthorizedHandler;

impl UnauthorizedHandler for JsonUnauthorizedHandler {
    fn build_response(&self, scheme: &str, realm: &str) -> Response {
        with_challenge(AppError::Unauthorized.into_response(), scheme, realm)
    }
}
