//! Authenticators: credentials → identity.
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::{BasicUserEntry, TokenEntry};
use crate::filter::{FilterError, Principal};
use crate::services::auth::credentials::{BasicCredentials, BearerToken};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credential backend unavailable: {0}")]
    Unavailable(String),
}

impl From<AuthError> for FilterError {
    fn from(e: AuthError) -> Self {
        FilterError::with_source("authenticator failed", e)
    }
}

/// Principal plus the roles granted to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub principal: Principal,
    pub roles: BTreeSet<String>,
}

impl Identity {
    pub fn new<I, S>(name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            principal: Principal::new(name),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolve credentials into an identity.
///
/// - `Ok(Some(_))`: valid credentials
/// - `Ok(None)`: credentials were checked and rejected
/// - `Err(_)`: the check itself could not be performed
#[async_trait]
pub trait Authenticator<C>: Send + Sync {
    async fn authenticate(&self, credentials: &C) -> Result<Option<Identity>, AuthError>;
}

type Digest32 = [u8; 32];

fn digest(secret: &str) -> Digest32 {
    Sha256::digest(secret.as_bytes()).into()
}

/// Fixed bearer-token table. Only SHA-256 digests of the tokens are kept.
#[derive(Debug, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<Digest32, Identity>,
}

impl StaticTokenAuthenticator {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a TokenEntry>) -> Self {
        let tokens = entries
            .into_iter()
            .map(|e| {
                (
                    digest(&e.token),
                    Identity::new(e.name.clone(), e.roles.iter().cloned()),
                )
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl Authenticator<BearerToken> for StaticTokenAuthenticator {
    async fn authenticate(&self, credentials: &BearerToken) -> Result<Option<Identity>, AuthError> {
        Ok(self.tokens.get(&digest(credentials.as_str())).cloned())
    }
}

#[derive(Debug)]
struct BasicUser {
    password: Digest32,
    identity: Identity,
}

/// Fixed username/password table for HTTP Basic.
#[derive(Debug, Default)]
pub struct StaticBasicAuthenticator {
    users: HashMap<String, BasicUser>,
}

impl StaticBasicAuthenticator {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a BasicUserEntry>) -> Self {
        let users = entries
            .into_iter()
            .map(|e| {
                let user = BasicUser {
                    password: digest(&e.password),
                    identity: Identity::new(e.username.clone(), e.roles.iter().cloned()),
                };
                (e.username.clone(), user)
            })
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl Authenticator<BasicCredentials> for StaticBasicAuthenticator {
    async fn authenticate(
        &self,
        credentials: &BasicCredentials,
    ) -> Result<Option<Identity>, AuthError> {
        let identity = self
            .users
            .get(&credentials.username)
            .filter(|user| user.password == digest(&credentials.password))
            .map(|user| user.identity.clone());
        Ok(identity)
    }
}
