//! The identity resolver: turns [`Credentials`] into an [`Actor`].
//!
//! Resolution order:
//!
//! ```text
//! bearer token present? ──yes──→ authenticate ──ok──→ Authenticated
//!        │                            │
//!        no                        rejected
//!        ↓                            ↓
//! guest username usable? ──yes──→ Guest
//!        │
//!        no ──→ IdentityError (AuthFailed if a token was rejected,
//!                             InvalidUsername if a name was unusable,
//!                             Missing otherwise)
//! ```
//!
//! Resolution is pure: it reads the credentials and asks the
//! authenticator, and never touches any game.

use crate::{Actor, Authenticator, Credentials, IdentityError};

/// Settings for guest identities.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Longest accepted guest username, in characters.
    ///
    /// Default: 32.
    pub max_username_len: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            max_username_len: 32,
        }
    }
}

impl IdentityConfig {
    /// Hard ceiling for `max_username_len`.
    pub const MAX_USERNAME_LEN_LIMIT: usize = 128;

    /// Clamps out-of-range values so the config is safe to use.
    pub fn validated(mut self) -> Self {
        if self.max_username_len == 0 || self.max_username_len > Self::MAX_USERNAME_LEN_LIMIT {
            let clamped = self.max_username_len.clamp(1, Self::MAX_USERNAME_LEN_LIMIT);
            tracing::warn!(
                requested = self.max_username_len,
                clamped,
                "max_username_len out of range, clamping"
            );
            self.max_username_len = clamped;
        }
        self
    }
}

/// Resolves request credentials to an [`Actor`].
pub struct IdentityResolver<A: Authenticator> {
    auth: A,
    config: IdentityConfig,
}

impl<A: Authenticator> IdentityResolver<A> {
    /// Creates a resolver around an authenticator.
    pub fn new(auth: A, config: IdentityConfig) -> Self {
        Self {
            auth,
            config: config.validated(),
        }
    }

    /// Returns the underlying authenticator.
    pub fn authenticator(&self) -> &A {
        &self.auth
    }

    /// Resolves credentials to an actor.
    ///
    /// A valid bearer token always wins. A rejected token falls back to the
    /// guest fields when they hold a usable username.
    ///
    /// # Errors
    /// - [`IdentityError::AuthFailed`]: token rejected, no usable guest name
    /// - [`IdentityError::InvalidUsername`]: guest name supplied but unusable
    /// - [`IdentityError::Missing`]: nothing supplied at all
    pub async fn resolve(&self, creds: &Credentials) -> Result<Actor, IdentityError> {
        let mut token_error = None;

        if let Some(token) = creds.bearer.as_deref().filter(|t| !t.trim().is_empty()) {
            match self.auth.authenticate(token.trim()).await {
                Ok(user) => {
                    return Ok(Actor::Authenticated {
                        user_id: user.user_id,
                        username: user.username,
                    });
                }
                Err(e) => {
                    tracing::debug!(error = %e, "bearer token rejected, trying guest identity");
                    token_error = Some(e);
                }
            }
        }

        match creds.guest_username.as_deref() {
            Some(raw) => match self.guest_username(raw) {
                Ok(username) => Ok(Actor::Guest {
                    username,
                    guest_id: creds
                        .guest_id
                        .as_deref()
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string),
                }),
                Err(e) => Err(token_error.unwrap_or(e)),
            },
            None => Err(token_error.unwrap_or(IdentityError::Missing)),
        }
    }

    /// Trims and validates a guest username.
    fn guest_username(&self, raw: &str) -> Result<String, IdentityError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(IdentityError::InvalidUsername("username is empty".into()));
        }
        if name.chars().count() > self.config.max_username_len {
            return Err(IdentityError::InvalidUsername(format!(
                "username longer than {} characters",
                self.config.max_username_len
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(IdentityError::InvalidUsername(
                "username contains control characters".into(),
            ));
        }
        Ok(name.to_string())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Naming follows `test_{function}_{scenario}_{expected}`.

    use super::*;
    use crate::TokenTable;
    use histime_protocol::UserId;

    fn resolver() -> IdentityResolver<TokenTable> {
        IdentityResolver::new(
            TokenTable::new().with_token("tok-ann", "u-1", "Ann"),
            IdentityConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_resolve_valid_token_returns_authenticated() {
        let actor = resolver()
            .resolve(&Credentials::bearer("tok-ann"))
            .await
            .unwrap();
        assert_eq!(
            actor,
            Actor::Authenticated {
                user_id: UserId("u-1".into()),
                username: "Ann".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_token_takes_precedence_over_guest() {
        let creds = Credentials {
            bearer: Some("tok-ann".into()),
            guest_username: Some("Someone".into()),
            guest_id: None,
        };
        let actor = resolver().resolve(&creds).await.unwrap();
        assert!(!actor.is_guest());
    }

    #[tokio::test]
    async fn test_resolve_guest_trims_name_and_keeps_guest_id() {
        let creds = Credentials::guest("  Bob ").with_guest_id(" g-7 ");
        let actor = resolver().resolve(&creds).await.unwrap();
        assert_eq!(
            actor,
            Actor::Guest {
                username: "Bob".into(),
                guest_id: Some("g-7".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_blank_guest_id_is_dropped() {
        let creds = Credentials::guest("Bob").with_guest_id("   ");
        let actor = resolver().resolve(&creds).await.unwrap();
        assert_eq!(actor.guest_id(), None);
    }

    #[tokio::test]
    async fn test_resolve_invalid_token_falls_back_to_guest() {
        let creds = Credentials {
            bearer: Some("stale".into()),
            guest_username: Some("Bob".into()),
            guest_id: None,
        };
        let actor = resolver().resolve(&creds).await.unwrap();
        assert_eq!(actor, Actor::guest("Bob"));
    }

    #[tokio::test]
    async fn test_resolve_invalid_token_without_guest_returns_auth_failed() {
        let result = resolver().resolve(&Credentials::bearer("stale")).await;
        assert!(matches!(result, Err(IdentityError::AuthFailed(_))));
    }

    #[tokio::test]
    async fn test_resolve_nothing_returns_missing() {
        let result = resolver().resolve(&Credentials::default()).await;
        assert!(matches!(result, Err(IdentityError::Missing)));
    }

    #[tokio::test]
    async fn test_resolve_blank_bearer_is_ignored() {
        let creds = Credentials {
            bearer: Some("  ".into()),
            guest_username: Some("Bob".into()),
            guest_id: None,
        };
        let actor = resolver().resolve(&creds).await.unwrap();
        assert!(actor.is_guest());
    }

    #[tokio::test]
    async fn test_resolve_empty_username_returns_invalid() {
        let result = resolver().resolve(&Credentials::guest("   ")).await;
        assert!(matches!(result, Err(IdentityError::InvalidUsername(_))));
    }

    #[tokio::test]
    async fn test_resolve_long_username_returns_invalid() {
        let name = "x".repeat(33);
        let result = resolver().resolve(&Credentials::guest(name)).await;
        assert!(matches!(result, Err(IdentityError::InvalidUsername(_))));
    }

    #[tokio::test]
    async fn test_resolve_control_chars_return_invalid() {
        let result = resolver().resolve(&Credentials::guest("bo\u{7}b")).await;
        assert!(matches!(result, Err(IdentityError::InvalidUsername(_))));
    }

    #[test]
    fn test_identity_config_validated_clamps() {
        let cfg = IdentityConfig { max_username_len: 0 }.validated();
        assert_eq!(cfg.max_username_len, 1);
        let cfg = IdentityConfig { max_username_len: 10_000 }.validated();
        assert_eq!(cfg.max_username_len, IdentityConfig::MAX_USERNAME_LEN_LIMIT);
    }
}
