use crate::filter::{Principal, RequestContext};

/// Decides whether an authenticated principal holds `role` for this request.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, principal: &Principal, role: &str, ctx: &RequestContext) -> bool;
}

/// Grants a role when the authenticator attached it to the security context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAuthorizer;

impl Authorizer for RoleAuthorizer {
    fn authorize(&self, _principal: &Principal, role: &str, ctx: &RequestContext) -> bool {
        ctx.security().is_user_in_role(role)
    }
}
