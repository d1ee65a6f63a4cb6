//! The resolved actor and the raw credentials it is resolved from.

use std::fmt;

use histime_protocol::UserId;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Raw identity material gathered from one request.
///
/// The HTTP layer fills this from the `Authorization` header, the guest
/// headers, and the body fields, in that order of preference. All fields
/// are optional; [`IdentityResolver`](crate::IdentityResolver) decides
/// what they add up to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub bearer: Option<String>,
    pub guest_username: Option<String>,
    pub guest_id: Option<String>,
}

impl Credentials {
    /// Credentials carrying only a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer: Some(token.into()),
            ..Self::default()
        }
    }

    /// Credentials carrying only a guest username.
    pub fn guest(username: impl Into<String>) -> Self {
        Self {
            guest_username: Some(username.into()),
            ..Self::default()
        }
    }

    /// Adds a guest id.
    pub fn with_guest_id(mut self, guest_id: impl Into<String>) -> Self {
        self.guest_id = Some(guest_id.into());
        self
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
///
/// The scheme is matched case-insensitively. Returns `None` for other
/// schemes or an empty token.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Who is performing an operation.
///
/// Authenticated players are matched to seats by `user_id`; guests by
/// `username` (and by `guest_id` when both sides carry one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// A player with a validated account.
    Authenticated { user_id: UserId, username: String },

    /// A player known only by a self-declared name.
    Guest {
        username: String,
        guest_id: Option<String>,
    },
}

impl Actor {
    /// Shorthand for a guest without a guest id.
    pub fn guest(username: impl Into<String>) -> Self {
        Self::Guest {
            username: username.into(),
            guest_id: None,
        }
    }

    /// Shorthand for an authenticated actor.
    pub fn authenticated(
        user_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self::Authenticated {
            user_id: UserId(user_id.into()),
            username: username.into(),
        }
    }

    /// Display name of the actor.
    pub fn username(&self) -> &str {
        match self {
            Self::Authenticated { username, .. } | Self::Guest { username, .. } => {
                username.as_str()
            }
        }
    }

    /// Account id, for authenticated actors.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Authenticated { user_id, .. } => Some(user_id),
            Self::Guest { .. } => None,
        }
    }

    /// Guest id, if the guest supplied one.
    pub fn guest_id(&self) -> Option<&str> {
        match self {
            Self::Guest { guest_id, .. } => guest_id.as_deref(),
            Self::Authenticated { .. } => None,
        }
    }

    /// Returns `true` for guests.
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest { .. })
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated { user_id, .. } => write!(f, "user:{user_id}"),
            Self::Guest { username, .. } => write!(f, "guest:{username}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extracts_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   xyz "), Some("xyz"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes_and_empty() {
        assert_eq!(bearer_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }

    #[test]
    fn test_actor_accessors() {
        let user = Actor::authenticated("u-1", "Ann");
        assert_eq!(user.username(), "Ann");
        assert_eq!(user.user_id(), Some(&UserId("u-1".into())));
        assert!(!user.is_guest());

        let guest = Actor::Guest {
            username: "Bob".into(),
            guest_id: Some("g-9".into()),
        };
        assert_eq!(guest.user_id(), None);
        assert_eq!(guest.guest_id(), Some("g-9"));
        assert!(guest.is_guest());
    }

    #[test]
    fn test_actor_display() {
        assert_eq!(Actor::authenticated("u-1", "Ann").to_string(), "user:u-1");
        assert_eq!(Actor::guest("Bob").to_string(), "guest:Bob");
    }
}
