/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the principal resolved by the filter chain (AuthCtx) to handlers
 * - axum specifics live in core; the type itself lives in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor (required principal)
 * - MaybeAuthCtx (optional principal)
 */

mod core;
mod types;

pub use self::core::{AuthCtxExtractor, MaybeAuthCtx};
pub use self::types::AuthCtx;
