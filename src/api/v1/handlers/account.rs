/*
 * Responsibility
 * - GET /me: who the chain authenticated
 * - GET /admin: admin-only; the role check already happened in the chain
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::dto::account::MeResponse;
use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(ctx.into())
}

pub async fn admin(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<Value> {
    tracing::info!(principal = %ctx.principal, "admin area accessed");
    Json(json!({ "admin": true, "principal": ctx.principal }))
}
