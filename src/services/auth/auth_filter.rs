//! Credential-based authentication filter.
//!
//! Extracts credentials of type `C`, resolves them through an
//! [`Authenticator`] and, on success, writes the identity into the request's
//! security context. Registered at [`Priority::AUTHENTICATION`].
//!
//! [`Priority::AUTHENTICATION`]: crate::filter::Priority::AUTHENTICATION
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;

use crate::filter::{Decision, Filter, FilterError, FilterKind, RequestContext};
use crate::services::auth::authenticator::{Authenticator, Identity};
use crate::services::auth::credentials::Credentials;
use crate::services::auth::unauthorized::{DefaultUnauthorizedHandler, UnauthorizedHandler};

/// What to do with a request that carries no credentials at all.
///
/// Invalid credentials are rejected in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    Required,
    #[default]
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAuthMode(String);

impl fmt::Display for InvalidAuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown auth mode: {}", self.0)
    }
}

impl std::error::Error for InvalidAuthMode {}

impl FromStr for AuthMode {
    type Err = InvalidAuthMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            other => Err(InvalidAuthMode(other.to_string())),
        }
    }
}

/// Result of checking one credential scheme.
#[derive(Debug)]
pub enum Outcome {
    Authenticated(Identity),
    Missing,
    Invalid,
}

/// Object-safe view of an auth filter, used to combine several schemes.
#[async_trait]
pub trait CredentialCheck: Send + Sync {
    fn scheme(&self) -> &'static str;

    async fn check(&self, ctx: &RequestContext) -> Result<Outcome, FilterError>;

    /// Rejection response carrying this scheme's challenge.
    fn challenge(&self) -> Response;
}

pub struct AuthFilter<C> {
    name: String,
    realm: String,
    mode: AuthMode,
    authenticator: Arc<dyn Authenticator<C>>,
    unauthorized: Arc<dyn UnauthorizedHandler>,
    _credentials: PhantomData<fn() -> C>,
}

impl<C: Credentials> AuthFilter<C> {
    pub fn new(authenticator: Arc<dyn Authenticator<C>>, realm: impl Into<String>) -> Self {
        Self {
            name: format!("{}-auth", C::SCHEME.to_ascii_lowercase()),
            realm: realm.into(),
            mode: AuthMode::default(),
            authenticator,
            unauthorized: Arc::new(DefaultUnauthorizedHandler),
            _credentials: PhantomData,
        }
    }

    pub fn with_mode(mut self, mode: AuthMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.unauthorized = handler;
        self
    }
}

#[async_trait]
impl<C: Credentials> CredentialCheck for AuthFilter<C> {
    fn scheme(&self) -> &'static str {
        C::SCHEME
    }

    async fn check(&self, ctx: &RequestContext) -> Result<Outcome, FilterError> {
        let Some(credentials) = C::extract(ctx) else {
            return Ok(Outcome::Missing);
        };

        match self.authenticator.authenticate(&credentials).await? {
            Some(identity) => Ok(Outcome::Authenticated(identity)),
            None => {
                tracing::warn!(scheme = C::SCHEME, path = ctx.path(), "credentials rejected");
                Ok(Outcome::Invalid)
            }
        }
    }

    fn challenge(&self) -> Response {
        self.unauthorized.build_response(C::SCHEME, &self.realm)
    }
}

#[async_trait]
impl<C: Credentials> Filter for AuthFilter<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Authentication
    }

    async fn apply(&self, ctx: &mut RequestContext) -> Result<Decision, FilterError> {
        match self.check(ctx).await? {
            Outcome::Authenticated(identity) => {
                tracing::debug!(principal = %identity.principal, scheme = C::SCHEME, "authenticated");
                ctx.security_mut()
                    .authenticate(identity.principal, identity.roles, C::SCHEME);
                Ok(Decision::Continue)
            }
            Outcome::Missing if self.mode == AuthMode::Optional => Ok(Decision::Continue),
            Outcome::Missing | Outcome::Invalid => Ok(Decision::Abort(self.challenge())),
        }
    }
}
