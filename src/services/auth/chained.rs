//! Several credential schemes behind one authentication filter.
//!
//! Schemes are tried in order and the first one that resolves an identity
//! wins. When none does, the request continues anonymously only if every
//! scheme found no credentials and the mode is optional; otherwise it is
//! rejected with the first scheme's challenge.
use std::sync::Arc;

use async_trait::async_trait;

use crate::filter::{Decision, Filter, FilterError, FilterKind, RequestContext};
use crate::services::auth::auth_filter::{AuthMode, CredentialCheck, Outcome};

pub struct ChainedAuthFilter {
    name: String,
    mode: AuthMode,
    checks: Vec<Arc<dyn CredentialCheck>>,
}

impl ChainedAuthFilter {
    pub fn new(checks: Vec<Arc<dyn CredentialCheck>>, mode: AuthMode) -> Self {
        let schemes: Vec<_> = checks
            .iter()
            .map(|c| c.scheme().to_ascii_lowercase())
            .collect();
        Self {
            name: format!("chained-auth[{}]", schemes.join(",")),
            mode,
            checks,
        }
    }
}

#[async_trait]
impl Filter for ChainedAuthFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Authentication
    }

    async fn apply(&self, ctx: &mut RequestContext) -> Result<Decision, FilterError> {
        let mut saw_invalid = false;

        for check in &self.checks {
            match check.check(ctx).await? {
                Outcome::Authenticated(identity) => {
                    tracing::debug!(
                        principal = %identity.principal,
                        scheme = check.scheme(),
                        "authenticated"
                    );
                    ctx.security_mut()
                        .authenticate(identity.principal, identity.roles, check.scheme());
                    return Ok(Decision::Continue);
                }
                Outcome::Invalid => saw_invalid = true,
                Outcome::Missing => {}
            }
        }

        if !saw_invalid && self.mode == AuthMode::Optional {
            return Ok(Decision::Continue);
        }

        match self.checks.first() {
            Some(first) => Ok(Decision::Abort(first.challenge())),
            // nothing to authenticate with; only reachable in required mode
            None => Err(FilterError::new("chained auth filter has no credential schemes")),
        }
    }
}
