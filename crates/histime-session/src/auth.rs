//! Authentication hook for validating bearer tokens.
//!
//! History Time doesn't implement authentication itself; accounts, JWT
//! signing, and OAuth belong to the auth service. This module defines the
//! [`Authenticator`] trait (a single async method from token to account)
//! and one implementation, [`TokenTable`], that looks tokens up in a fixed
//! map.
//!
//! # Why a trait?
//!
//! The HTTP layer is generic over the authenticator, so production can use
//! a JWT verifier, development a token file, and tests an in-memory table,
//! without changing any framework code.

use std::collections::HashMap;
use std::path::Path;

use histime_protocol::UserId;
use serde::{Deserialize, Serialize};

use crate::IdentityError;

/// The account a valid token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Validates a bearer token and returns the account it belongs to.
///
/// `Send + Sync + 'static` because one authenticator is shared by every
/// request handler for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use histime_protocol::UserId;
/// use histime_session::{AuthenticatedUser, Authenticator, IdentityError};
///
/// /// Treats the token itself as the user id. Development only.
/// struct EchoAuthenticator;
///
/// impl Authenticator for EchoAuthenticator {
///     async fn authenticate(
///         &self,
///         token: &str,
///     ) -> Result<AuthenticatedUser, IdentityError> {
///         Ok(AuthenticatedUser {
///             user_id: UserId(token.to_string()),
///             username: token.to_string(),
///         })
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates `token`.
    ///
    /// # Returns
    /// - `Ok(AuthenticatedUser)`: the token is valid
    /// - `Err(IdentityError::AuthFailed)`: the token is invalid or expired
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<AuthenticatedUser, IdentityError>> + Send;
}

// ---------------------------------------------------------------------------
// TokenTable
// ---------------------------------------------------------------------------

/// An [`Authenticator`] backed by a fixed token → account map.
///
/// The JSON file format is an object keyed by token:
///
/// ```json
/// { "tok-ann": { "userId": "u-1", "username": "Ann" } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl TokenTable {
    /// Creates an empty table. Every token is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token.
    pub fn with_token(
        mut self,
        token: impl Into<String>,
        user_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        self.tokens.insert(
            token.into(),
            AuthenticatedUser {
                user_id: UserId(user_id.into()),
                username: username.into(),
            },
        );
        self
    }

    /// Loads a table from a JSON file.
    ///
    /// # Errors
    /// Returns [`IdentityError::TokenTable`] if the file can't be read or
    /// parsed.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IdentityError::TokenTable(format!("{}: {e}", path.display())))?;
        let tokens: HashMap<String, AuthenticatedUser> = serde_json::from_slice(&bytes)
            .map_err(|e| IdentityError::TokenTable(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), tokens = tokens.len(), "token table loaded");
        Ok(Self { tokens })
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no tokens are registered.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Authenticator for TokenTable {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::AuthFailed("unknown token".into()))
    }
}
