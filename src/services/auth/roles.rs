//! Path-scoped access rules, enforced at [`Priority::AUTHORIZATION`].
//!
//! [`Priority::AUTHORIZATION`]: crate::filter::Priority::AUTHORIZATION
use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::IntoResponse;

use crate::error::AppError;
use crate::filter::{Decision, Filter, FilterError, FilterKind, RequestContext};
use crate::services::auth::authorizer::Authorizer;
use crate::services::auth::unauthorized::UnauthorizedHandler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRule {
    PermitAll,
    DenyAll,
    /// Any authenticated principal.
    Authenticated,
    /// Principal must hold at least one of the roles.
    RolesAllowed(BTreeSet<String>),
}

pub struct RolesAllowedFilter {
    rules: Vec<(String, AccessRule)>,
    authorizer: Arc<dyn Authorizer>,
    unauthorized: Arc<dyn UnauthorizedHandler>,
    challenge_scheme: String,
    realm: String,
}

impl RolesAllowedFilter {
    pub fn new(
        authorizer: Arc<dyn Authorizer>,
        unauthorized: Arc<dyn UnauthorizedHandler>,
        challenge_scheme: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            rules: Vec::new(),
            authorizer,
            unauthorized,
            challenge_scheme: challenge_scheme.into(),
            realm: realm.into(),
        }
    }

    pub fn rule(mut self, path_prefix: impl Into<String>, rule: AccessRule) -> Self {
        self.rules.push((path_prefix.into(), rule));
        self
    }

    pub fn permit_all(self, path_prefix: impl Into<String>) -> Self {
        self.rule(path_prefix, AccessRule::PermitAll)
    }

    pub fn deny_all(self, path_prefix: impl Into<String>) -> Self {
        self.rule(path_prefix, AccessRule::DenyAll)
    }

    pub fn authenticated(self, path_prefix: impl Into<String>) -> Self {
        self.rule(path_prefix, AccessRule::Authenticated)
    }

    pub fn roles_allowed<I, S>(self, path_prefix: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles = roles.into_iter().map(Into::into).collect();
        self.rule(path_prefix, AccessRule::RolesAllowed(roles))
    }

    /// Longest matching prefix wins. `None` means no rule applies (permit).
    pub fn rule_for(&self, path: &str) -> Option<&AccessRule> {
        self.rules
            .iter()
            .filter(|(prefix, _)| matches_prefix(path, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, rule)| rule)
    }

    fn unauthorized(&self) -> Decision {
        Decision::Abort(
            self.unauthorized
                .build_response(&self.challenge_scheme, &self.realm),
        )
    }
}

/// Segment-aware prefix match: `/admin` matches `/admin` and `/admin/x`, not `/administrator`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

#[async_trait]
impl Filter for RolesAllowedFilter {
    fn name(&self) -> &str {
        "roles-allowed"
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Authorization
    }

    async fn apply(&self, ctx: &mut RequestContext) -> Result<Decision, FilterError> {
        let Some(rule) = self.rule_for(ctx.path()) else {
            return Ok(Decision::Continue);
        };

        let decision = match rule {
            AccessRule::PermitAll => Decision::Continue,
            AccessRule::DenyAll => Decision::Abort(AppError::Forbidden.into_response()),
            AccessRule::Authenticated => match ctx.security().principal() {
                Some(_) => Decision::Continue,
                None => self.unauthorized(),
            },
            AccessRule::RolesAllowed(roles) => match ctx.security().principal() {
                None => self.unauthorized(),
                Some(principal) => {
                    if roles
                        .iter()
                        .any(|role| self.authorizer.authorize(principal, role, ctx))
                    {
                        Decision::Continue
                    } else {
                        tracing::info!(%principal, path = ctx.path(), "principal lacks required role");
                        Decision::Abort(AppError::Forbidden.into_response())
                    }
                }
            },
        };
        Ok(decision)
    }
}
