//! Request filter chain → AuthCtx in request extensions.
//!
//! Every request routed through this middleware gets a fresh
//! `RequestContext`, runs the shared `FilterChain` once, and then either
//! - returns the response of the filter that aborted, or
//! - forwards the request to the handler with `AuthCtx` attached when a
//!   principal was resolved.
//!
//! A filter failure is never turned into a rejection here; it becomes a 500.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::filter::RequestContext;
use crate::state::AppState;

/// Run the filter chain in front of every route of `router`.
///
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();

    let mut ctx = RequestContext::from_parts(&parts);

    if let Some(response) = state.filters.run(&mut ctx).await? {
        return Ok(response);
    }

    let mut req = Request::from_parts(parts, body);
    if let Some(auth_ctx) = AuthCtx::from_security(ctx.security()) {
        // middleware → extractor
        req.extensions_mut().insert(auth_ctx);
    }

    Ok(next.run(req).await)
}
