/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - Built by the access middleware from the chain's SecurityContext and stored
 *   in request extensions; handlers only ever receive this type
 */
use crate::filter::SecurityContext;

/// Context attached to requests whose principal was resolved.
///
/// - `principal` is the authenticated name
/// - `roles` are coarse-grained grants from the authenticator
/// - `scheme` is the authorization scheme that succeeded (`Bearer`, `Basic`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub principal: String,
    pub roles: Vec<String>,
    pub scheme: Option<String>,
}

impl AuthCtx {
    /// `None` when the chain finished without a principal.
    pub fn from_security(security: &SecurityContext) -> Option<Self> {
        let principal = security.principal()?;
        Some(Self {
            principal: principal.name().to_string(),
            roles: security.roles().iter().cloned().collect(),
            scheme: security.scheme().map(str::to_string),
        })
    }
}
