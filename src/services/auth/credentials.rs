//! Credential extraction from the `Authorization` header.
//!
//! Anything malformed is treated as "no credentials" here; whether that is a
//! rejection is up to the auth filter and its mode.
use std::fmt;

use axum::http::header;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::filter::RequestContext;

pub trait Credentials: Sized + Send + Sync + 'static {
    /// Authorization scheme, also used in the `WWW-Authenticate` challenge.
    const SCHEME: &'static str;

    fn extract(ctx: &RequestContext) -> Option<Self>;
}

/// Value of `Authorization: <scheme> <value>`, scheme matched case-insensitively.
fn authorization_value<'a>(ctx: &'a RequestContext, scheme: &str) -> Option<&'a str> {
    let raw = ctx.header(header::AUTHORIZATION.as_str())?.trim();
    let (prefix, value) = raw.split_once(' ')?;
    if !prefix.eq_ignore_ascii_case(scheme) {
        return None;
    }
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

// keep passwords out of logs
impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl BasicCredentials {
    pub fn parse(encoded: &str) -> Option<Self> {
        let decoded = STANDARD.decode(encoded).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        // the password may itself contain ':'
        let (username, password) = decoded.split_once(':')?;
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl Credentials for BasicCredentials {
    const SCHEME: &'static str = "Basic";

    fn extract(ctx: &RequestContext) -> Option<Self> {
        authorization_value(ctx, Self::SCHEME).and_then(Self::parse)
    }
}

/// OAuth2 bearer token. Falls back to the `access_token` query parameter
/// when the request carries no `Authorization` header at all.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

impl BearerToken {
    pub const QUERY_PARAM: &'static str = "access_token";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Credentials for BearerToken {
    const SCHEME: &'static str = "Bearer";

    fn extract(ctx: &RequestContext) -> Option<Self> {
        if ctx.headers().contains_key(header::AUTHORIZATION) {
            return authorization_value(ctx, Self::SCHEME).map(|v| Self(v.to_string()));
        }
        ctx.query_param(Self::QUERY_PARAM)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self)
    }
}
