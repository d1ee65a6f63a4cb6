//! Server configuration loaded from environment variables.
//!
//! Every setting has a default, so the server starts with zero
//! configuration for local development.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use histime::prelude::{GameRules, IdentityConfig};

/// A variable was set to something that doesn't parse.
#[derive(Debug, thiserror::Error)]
#[error("{var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address.
    /// Env: `HISTIME_BIND`
    /// Default: `127.0.0.1:8080`
    pub bind: SocketAddr,

    /// JSON file games are restored from and snapshotted to.
    /// Env: `HISTIME_SNAPSHOT_PATH`
    /// Default: none (games live in memory only).
    pub snapshot_path: Option<PathBuf>,

    /// JSON card catalogue.
    /// Env: `HISTIME_DECK_PATH`
    /// Default: none (built-in deck).
    pub deck_path: Option<PathBuf>,

    /// JSON token table mapping bearer tokens to accounts.
    /// Env: `HISTIME_TOKENS_PATH`
    /// Default: none (guests only).
    pub tokens_path: Option<PathBuf>,

    /// Env: `HISTIME_HAND_SIZE`, `HISTIME_MAX_CODE_ATTEMPTS`,
    /// `HISTIME_ACCEPT_EQUAL_YEARS`, `HISTIME_DEFAULT_MAX_PLAYERS`
    pub rules: GameRules,

    /// Env: `HISTIME_MAX_USERNAME_LEN`
    pub identity: IdentityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: ([127, 0, 0, 1], 8080).into(),
            snapshot_path: None,
            deck_path: None,
            tokens_path: None,
            rules: GameRules::default(),
            identity: IdentityConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(bind) = parse(&get, "HISTIME_BIND")? {
            config.bind = bind;
        }
        config.snapshot_path = get("HISTIME_SNAPSHOT_PATH").map(PathBuf::from);
        config.deck_path = get("HISTIME_DECK_PATH").map(PathBuf::from);
        config.tokens_path = get("HISTIME_TOKENS_PATH").map(PathBuf::from);

        if let Some(n) = parse(&get, "HISTIME_HAND_SIZE")? {
            config.rules.hand_size = n;
        }
        if let Some(n) = parse(&get, "HISTIME_MAX_CODE_ATTEMPTS")? {
            config.rules.max_code_attempts = n;
        }
        if let Some(flag) = parse_flag(&get, "HISTIME_ACCEPT_EQUAL_YEARS")? {
            config.rules.accept_equal_years = flag;
        }
        if let Some(n) = parse(&get, "HISTIME_DEFAULT_MAX_PLAYERS")? {
            config.rules.default_max_players = n;
        }
        if let Some(n) = parse(&get, "HISTIME_MAX_USERNAME_LEN")? {
            config.identity.max_username_len = n;
        }

        Ok(config)
    }

    /// Clamps out-of-range values in the nested configs.
    pub fn validated(mut self) -> Self {
        self.rules = self.rules.validated();
        self.identity = self.identity.validated();
        self
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get(var)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

fn parse_flag(get: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<bool>, ConfigError> {
    get(var)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError {
                var,
                value,
                reason: "expected true or false".into(),
            }),
        })
        .transpose()
}
