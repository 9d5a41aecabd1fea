use axum::Json;

use crate::api::v1::dto::account::GreetingResponse;
use crate::api::v1::extractors::MaybeAuthCtx;

/// Permit-all route; greets the optional principal.
pub async fn greeting(MaybeAuthCtx(ctx): MaybeAuthCtx) -> Json<GreetingResponse> {
    let response = match ctx {
        Some(ctx) => GreetingResponse {
            message: format!("hello, {}", ctx.principal),
            authenticated: true,
        },
        None => GreetingResponse {
            message: "hello, anonymous".to_string(),
            authenticated: false,
        },
    };
    Json(response)
}
