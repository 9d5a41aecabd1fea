/*
 * Responsibility
 * - v1 URL layout
 * - /health is public; everything else runs behind the request filter chain
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    account::{admin, me},
    greeting::greeting,
    health::health,
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = Router::new()
        .route("/greeting", get(greeting))
        .route("/me", get(me))
        .route("/admin", get(admin));
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
