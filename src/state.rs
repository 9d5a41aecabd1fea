/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - filters: the sealed request filter chain
 * - Cheap to clone (Arc inside); the chain is immutable once sealed
 */
use std::sync::Arc;

use crate::filter::FilterChain;

#[derive(Clone, Debug)]
pub struct AppState {
    pub filters: Arc<FilterChain>,
}

impl AppState {
    pub fn new(filters: Arc<FilterChain>) -> Self {
        Self { filters }
    }
}
