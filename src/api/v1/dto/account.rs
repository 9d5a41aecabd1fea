use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal: String,
    pub roles: Vec<String>,
    pub scheme: Option<String>,
}

impl From<AuthCtx> for MeResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            principal: ctx.principal,
            roles: ctx.roles,
            scheme: ctx.scheme,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub message: String,
    pub authenticated: bool,
}
