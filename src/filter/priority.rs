//! Filter priorities.
//!
//! Lower values run first. The named classes follow the usual request-filter
//! bands: authentication, then authorization, then header decoration, entity
//! coding and finally plain user filters.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(i32);

impl Priority {
    pub const AUTHENTICATION: Priority = Priority(1000);
    pub const AUTHORIZATION: Priority = Priority(2000);
    pub const HEADER_DECORATOR: Priority = Priority(3000);
    pub const ENTITY_CODER: Priority = Priority(4000);
    pub const USER: Priority = Priority(5000);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// Negative priorities are reserved and rejected when a chain is sealed.
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::AUTHENTICATION => write!(f, "authentication({})", self.0),
            Self::AUTHORIZATION => write!(f, "authorization({})", self.0),
            Self::HEADER_DECORATOR => write!(f, "header-decorator({})", self.0),
            Self::ENTITY_CODER => write!(f, "entity-coder({})", self.0),
            Self::USER => write!(f, "user({})", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// Role a filter plays in the chain. Only used to validate ordering between
/// authentication and authorization filters when the chain is sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Authentication,
    Authorization,
    Generic,
}
