/*
 * Responsibility
 * - Public interface of the middleware layer (re-exports)
 * - auth::access::apply(...) runs the request filter chain
 * - http::apply(...) adds transport-level layers
 */
pub mod auth;
pub mod http;
