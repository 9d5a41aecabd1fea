/// Factory: build the request filter chain from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::filter::{ChainError, FilterChain, Priority};
use crate::services::auth::auth_filter::{AuthFilter, CredentialCheck};
use crate::services::auth::authenticator::{StaticBasicAuthenticator, StaticTokenAuthenticator};
use crate::services::auth::authorizer::RoleAuthorizer;
use crate::services::auth::chained::ChainedAuthFilter;
use crate::services::auth::credentials::{BasicCredentials, BearerToken, Credentials};
use crate::services::auth::roles::RolesAllowedFilter;
use crate::services::auth::unauthorized::{JsonUnauthorizedHandler, UnauthorizedHandler};

pub fn build_filter_chain(config: &Config) -> Result<Arc<FilterChain>, ChainError> {
    let unauthorized: Arc<dyn UnauthorizedHandler> = Arc::new(JsonUnauthorizedHandler);

    let tokens = StaticTokenAuthenticator::from_entries(&config.auth_tokens);
    let users = StaticBasicAuthenticator::from_entries(&config.basic_users);

    if tokens.is_empty() && users.is_empty() {
        tracing::warn!("no credentials configured; protected routes will reject every caller");
    }

    let mut checks: Vec<Arc<dyn CredentialCheck>> = Vec::new();
    // Bearer stays registered even with an empty table so rejections carry its challenge.
    if !tokens.is_empty() || users.is_empty() {
        checks.push(Arc::new(
            AuthFilter::<BearerToken>::new(Arc::new(tokens), &config.auth_realm)
                .with_mode(config.auth_mode)
                .with_unauthorized_handler(unauthorized.clone()),
        ));
    }
    if !users.is_empty() {
        checks.push(Arc::new(
            AuthFilter::<BasicCredentials>::new(Arc::new(users), &config.auth_realm)
                .with_mode(config.auth_mode)
                .with_unauthorized_handler(unauthorized.clone()),
        ));
    }

    let challenge_scheme = checks
        .first()
        .map(|check| check.scheme())
        .unwrap_or(BearerToken::SCHEME);

    let authentication = ChainedAuthFilter::new(checks, config.auth_mode);

    let authorization = RolesAllowedFilter::new(
        Arc::new(RoleAuthorizer),
        unauthorized,
        challenge_scheme,
        &config.auth_realm,
    )
    .authenticated("/api/v1")
    .permit_all("/api/v1/greeting")
    .authenticated("/api/v1/me")
    .roles_allowed("/api/v1/admin", ["admin"]);

    let chain = FilterChain::builder()
        .register(authentication, Priority::AUTHENTICATION)
        .register(authorization, Priority::AUTHORIZATION)
        .build()?;

    Ok(Arc::new(chain))
}
