//! Priority-ordered request filter chain.
//!
//! Filters are registered with an explicit [`Priority`] and sealed into an
//! immutable [`FilterChain`]. Sealing stable-sorts the registrations, so
//! filters that share a priority keep their registration order.
//!
//! A run walks the sorted filters once. The first `Decision::Abort` ends the
//! run and its response becomes the result; a filter error ends the run and
//! is returned to the caller untouched.
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::context::RequestContext;
use super::priority::{FilterKind, Priority};

pub enum Decision {
    Continue,
    Abort(Response),
}

impl Decision {
    pub fn abort(response: impl IntoResponse) -> Self {
        Self::Abort(response.into_response())
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort(_))
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Continue => f.write_str("Continue"),
            Decision::Abort(resp) => write!(f, "Abort({})", resp.status()),
        }
    }
}

/// Unexpected failure inside a filter (backend down, broken invariant...).
///
/// Expected rejections are not errors; they are `Decision::Abort`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FilterError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl FilterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid filter configuration: {0}")]
    Configuration(String),

    #[error("filter `{filter}` failed: {source}")]
    Filter {
        filter: String,
        #[source]
        source: FilterError,
    },

    #[error("filter chain already ran for this request")]
    AlreadyTerminated,
}

#[async_trait]
pub trait Filter: Send + Sync {
    /// Stable name used in logs and error reports.
    fn name(&self) -> &str;

    fn kind(&self) -> FilterKind {
        FilterKind::Generic
    }

    async fn apply(&self, ctx: &mut RequestContext) -> Result<Decision, FilterError>;
}

#[derive(Clone)]
struct Registration {
    filter: Arc<dyn Filter>,
    priority: Priority,
}

#[derive(Default)]
pub struct FilterChainBuilder {
    registrations: Vec<Registration>,
}

impl FilterChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(self, filter: F, priority: Priority) -> Self
    where
        F: Filter + 'static,
    {
        self.register_arc(Arc::new(filter), priority)
    }

    pub fn register_arc(mut self, filter: Arc<dyn Filter>, priority: Priority) -> Self {
        self.registrations.push(Registration { filter, priority });
        self
    }

    /// Validate the registrations and seal them into a chain.
    ///
    /// Every authentication filter must sort strictly before every
    /// authorization filter, otherwise an authorizer could observe a request
    /// before its principal is resolved.
    pub fn build(self) -> Result<FilterChain, ChainError> {
        let mut registrations = self.registrations;

        if let Some(bad) = registrations.iter().find(|r| !r.priority.is_valid()) {
            return Err(ChainError::Configuration(format!(
                "filter `{}` has negative priority {}",
                bad.filter.name(),
                bad.priority.value()
            )));
        }

        let last_authn = registrations
            .iter()
            .filter(|r| r.filter.kind() == FilterKind::Authentication)
            .max_by_key(|r| r.priority);
        let first_authz = registrations
            .iter()
            .filter(|r| r.filter.kind() == FilterKind::Authorization)
            .min_by_key(|r| r.priority);

        if let (Some(authn), Some(authz)) = (last_authn, first_authz) {
            if authn.priority >= authz.priority {
                return Err(ChainError::Configuration(format!(
                    "authentication filter `{}` ({}) must run before authorization filter `{}` ({})",
                    authn.filter.name(),
                    authn.priority,
                    authz.filter.name(),
                    authz.priority
                )));
            }
        }

        // slice::sort_by_key is stable
        registrations.sort_by_key(|r| r.priority);

        Ok(FilterChain {
            filters: registrations,
        })
    }
}

pub struct FilterChain {
    filters: Vec<Registration>,
}

impl FilterChain {
    pub fn builder() -> FilterChainBuilder {
        FilterChainBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter names in execution order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|r| r.filter.name()).collect()
    }

    /// Run every filter against `ctx` in priority order.
    ///
    /// Returns `Ok(Some(response))` when a filter aborted and `Ok(None)` when
    /// the request should proceed to its handler.
    pub async fn run(&self, ctx: &mut RequestContext) -> Result<Option<Response>, ChainError> {
        if ctx.is_terminated() {
            return Err(ChainError::AlreadyTerminated);
        }

        for entry in &self.filters {
            let name = entry.filter.name();
            tracing::debug!(filter = name, priority = %entry.priority, "applying request filter");

            match entry.filter.apply(ctx).await {
                Ok(Decision::Continue) => {}
                Ok(Decision::Abort(response)) => {
                    ctx.terminate();
                    tracing::info!(
                        filter = name,
                        status = response.status().as_u16(),
                        method = %ctx.method(),
                        path = ctx.path(),
                        "request aborted by filter"
                    );
                    return Ok(Some(response));
                }
                Err(source) => {
                    ctx.terminate();
                    tracing::error!(filter = name, error = %source, "request filter failed");
                    return Err(ChainError::Filter {
                        filter: name.to_string(),
                        source,
                    });
                }
            }
        }

        ctx.terminate();
        Ok(None)
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.filters
                    .iter()
                    .map(|r| format!("{}@{}", r.filter.name(), r.priority)),
            )
            .finish()
    }
}
