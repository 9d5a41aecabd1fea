pub mod auth_filter;
pub mod authenticator;
pub mod authorizer;
pub mod chained;
pub mod credentials;
pub mod factory;
pub mod roles;
pub mod unauthorized;

pub use auth_filter::{AuthFilter, AuthMode};
pub use authenticator::{AuthError, Authenticator, Identity};
pub use factory::build_filter_chain;
