/*
 * Responsibility
 * - Load settings from the environment (PORT, auth realm/mode, credential tables, HTTP limits)
 * - Validate values eagerly (startup fails on anything malformed)
 */
use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::AuthMode;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// `AUTH_TOKENS` entry: `token:name[:role1|role2]`.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenEntry {
    pub token: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl fmt::Debug for TokenEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEntry")
            .field("name", &self.name)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// `AUTH_BASIC_USERS` entry: `user:password:role1|role2` (roles may be empty).
#[derive(Clone, PartialEq, Eq)]
pub struct BasicUserEntry {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

impl fmt::Debug for BasicUserEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicUserEntry")
            .field("username", &self.username)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

pub struct Config {
    pub addr: SocketAddr,

    pub auth_realm: String,
    pub auth_mode: AuthMode,
    pub auth_tokens: Vec<TokenEntry>,
    pub basic_users: Vec<BasicUserEntry>,

    pub request_timeout: Duration,
    pub request_body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests use a map).
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let auth_realm = var("AUTH_REALM")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "authchain".to_string());

        let auth_mode = match var("AUTH_MODE") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("AUTH_MODE"))?,
            None => AuthMode::default(),
        };

        let auth_tokens = parse_entries(
            var("AUTH_TOKENS").as_deref(),
            parse_token_entry,
            |e| &e.token,
        )
        .ok_or(ConfigError::Invalid("AUTH_TOKENS"))?;

        let basic_users = parse_entries(
            var("AUTH_BASIC_USERS").as_deref(),
            parse_basic_user,
            |e| &e.username,
        )
        .ok_or(ConfigError::Invalid("AUTH_BASIC_USERS"))?;

        let request_timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?,
            None => 30,
        };

        let request_body_limit = match var("REQUEST_BODY_LIMIT_BYTES") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        Ok(Self {
            addr,
            auth_realm,
            auth_mode,
            auth_tokens,
            basic_users,
            request_timeout: Duration::from_secs(request_timeout_secs),
            request_body_limit,
        })
    }
}

/// Comma-separated entries; blanks are skipped. A malformed entry or a repeated
/// key fails the whole list.
fn parse_entries<T>(
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
    key: fn(&T) -> &str,
) -> Option<Vec<T>> {
    let entries: Vec<T> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse)
        .collect::<Option<_>>()?;

    let unique = {
        let mut seen = HashSet::new();
        entries.iter().all(|e| seen.insert(key(e)))
    };
    unique.then_some(entries)
}

fn parse_roles(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_token_entry(raw: &str) -> Option<TokenEntry> {
    let mut fields = raw.splitn(3, ':');
    let token = fields.next()?.trim();
    let name = fields.next()?.trim();
    if token.is_empty() || name.is_empty() {
        return None;
    }
    Some(TokenEntry {
        token: token.to_string(),
        name: name.to_string(),
        roles: fields.next().map(parse_roles).unwrap_or_default(),
    })
}

fn parse_basic_user(raw: &str) -> Option<BasicUserEntry> {
    // password sits in the middle and may contain ':'
    let (username, rest) = raw.split_once(':')?;
    let (password, roles) = rest.rsplit_once(':')?;
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some(BasicUserEntry {
        username: username.to_string(),
        password: password.to_string(),
        roles: parse_roles(roles),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.auth_realm, "authchain");
        assert_eq!(config.auth_mode, AuthMode::Optional);
        assert!(config.auth_tokens.is_empty());
        assert!(config.basic_users.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.request_body_limit, 1024 * 1024);
    }

    #[test]
    fn parses_credential_tables() {
        let config = load(&[
            ("AUTH_TOKENS", "t-alice:alice:admin|user, t-bob:bob ,"),
            ("AUTH_BASIC_USERS", "carol:pa:ss:user"),
            ("AUTH_MODE", "required"),
        ])
        .unwrap();

        assert_eq!(
            config.auth_tokens,
            vec![
                TokenEntry {
                    token: "t-alice".into(),
                    name: "alice".into(),
                    roles: vec!["admin".into(), "user".into()],
                },
                TokenEntry {
                    token: "t-bob".into(),
                    name: "bob".into(),
                    roles: vec![],
                },
            ]
        );
        assert_eq!(config.basic_users[0].password, "pa:ss");
        assert_eq!(config.basic_users[0].roles, ["user"]);
        assert_eq!(config.auth_mode, AuthMode::Required);
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(load(&[("PORT", "http")]).err(), Some(ConfigError::Invalid("PORT")));
        assert_eq!(
            load(&[("AUTH_MODE", "maybe")]).err(),
            Some(ConfigError::Invalid("AUTH_MODE"))
        );
        assert_eq!(
            load(&[("AUTH_TOKENS", "lonely-token")]).err(),
            Some(ConfigError::Invalid("AUTH_TOKENS"))
        );
        assert_eq!(
            load(&[("AUTH_BASIC_USERS", "carol:pw")]).err(),
            Some(ConfigError::Invalid("AUTH_BASIC_USERS"))
        );
        assert_eq!(
            load(&[("REQUEST_TIMEOUT_SECS", "0")]).err(),
            Some(ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))
        );
    }

    #[test]
    fn rejects_duplicate_credentials() {
        assert_eq!(
            load(&[("AUTH_TOKENS", "t-1:alice:admin,t-2:bob, t-1:mallory:admin")]).err(),
            Some(ConfigError::Invalid("AUTH_TOKENS"))
        );
        assert_eq!(
            load(&[("AUTH_BASIC_USERS", "carol:one:user,carol:two:admin")]).err(),
            Some(ConfigError::Invalid("AUTH_BASIC_USERS"))
        );

        // one principal may own several tokens
        let config = load(&[("AUTH_TOKENS", "t-1:alice,t-2:alice")]).unwrap();
        assert_eq!(config.auth_tokens.len(), 2);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = load(&[("AUTH_TOKENS", "sekrit:alice")]).unwrap();
        assert!(!format!("{:?}", config.auth_tokens).contains("sekrit"));
    }
}
