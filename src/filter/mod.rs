/*!
 * Request filter pipeline
 *
 * Responsibility:
 * - Priority-ordered, short-circuiting chain of request filters
 * - Per-request context the filters read and annotate (principal, roles)
 *
 * Public API:
 * - Filter / Decision / FilterError
 * - FilterChain / FilterChainBuilder / ChainError
 * - RequestContext / SecurityContext / Principal
 * - Priority / FilterKind
 */

mod chain;
mod context;
mod priority;

pub use chain::{ChainError, Decision, Filter, FilterChain, FilterChainBuilder, FilterError};
pub use context::{Principal, RequestContext, RunState, SecurityContext};
pub use priority::{FilterKind, Priority};
