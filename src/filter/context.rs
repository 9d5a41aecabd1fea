/*
 * Responsibility
 * - Per-request carrier passed through the filter chain (RequestContext)
 * - Narrow security context: optional principal, role set, auth scheme
 * - Request line / headers are read-only; only the security context is mutable
 */
use std::collections::BTreeSet;
use std::fmt;

use axum::extract::OriginalUri;
use axum::http::{HeaderMap, Method, Uri, request::Parts};

/// Resolved identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    name: String,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    principal: Option<Principal>,
    roles: BTreeSet<String>,
    scheme: Option<String>,
    secure: bool,
}

impl SecurityContext {
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn is_user_in_role(&self, role: &str) -> bool {
        self.principal.is_some() && self.roles.contains(role)
    }

    pub fn set_principal(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }

    /// Replace the whole identity. Roles from an earlier identity are dropped.
    pub fn authenticate<I>(&mut self, principal: Principal, roles: I, scheme: &str)
    where
        I: IntoIterator<Item = String>,
    {
        self.principal = Some(principal);
        self.roles = roles.into_iter().collect();
        self.scheme = Some(scheme.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated,
}

#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    security: SecurityContext,
    state: RunState,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let secure = uri.scheme_str() == Some("https");
        Self {
            method,
            uri,
            headers,
            security: SecurityContext {
                secure,
                ..SecurityContext::default()
            },
            state: RunState::Running,
        }
    }

    /// Build a context from request parts.
    ///
    /// Nested routers see a stripped path, so the `OriginalUri` extension wins
    /// when present.
    pub fn from_parts(parts: &Parts) -> Self {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|OriginalUri(uri)| uri.clone())
            .unwrap_or_else(|| parts.uri.clone());
        Self::new(parts.method.clone(), uri, parts.headers.clone())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First value of a query parameter, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn security(&self) -> &SecurityContext {
        &self.security
    }

    pub fn security_mut(&mut self) -> &mut SecurityContext {
        &mut self.security
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == RunState::Terminated
    }

    pub(crate) fn terminate(&mut self) {
        self.state = RunState::Terminated;
    }
}
