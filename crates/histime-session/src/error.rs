//! Error types for the identity layer.

/// Errors that can occur while resolving who is making a request.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Neither a bearer token nor a guest username was supplied.
    #[error("no bearer token or guest username supplied")]
    Missing,

    /// A token was supplied but the [`Authenticator`](crate::Authenticator)
    /// rejected it, and no guest username was available to fall back on.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The guest username is empty, too long, or contains control characters.
    #[error("invalid guest username: {0}")]
    InvalidUsername(String),

    /// The token table could not be loaded.
    #[error("token table unavailable: {0}")]
    TokenTable(String),
}
