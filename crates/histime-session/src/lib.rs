//! Actor identity for History Time.
//!
//! Every game operation is performed by an [`Actor`]: either an
//! authenticated account or a guest who only declared a username. This
//! crate turns the raw request material ([`Credentials`]: bearer token,
//! guest username, guest id) into exactly one `Actor`, once, at the
//! boundary. Nothing below this layer ever looks at headers.
//!
//! # How it fits in the stack
//!
//! ```text
//! HTTP layer  ← extracts Credentials from headers/body
//!     ↓
//! Identity (this crate)  ← Credentials → Actor
//!     ↓
//! Room layer  ← matches Actors against seats
//! ```
//!
//! Token validation is not implemented here. The [`Authenticator`] trait
//! is the seam where a JWT verifier or an auth-service client plugs in;
//! [`TokenTable`] is a static lookup for development and tests.

#![allow(async_fn_in_trait)]

mod actor;
mod auth;
mod error;
mod resolver;

pub use actor::{Actor, Credentials, bearer_token};
pub use auth::{AuthenticatedUser, Authenticator, TokenTable};
pub use error::IdentityError;
pub use resolver::{IdentityConfig, IdentityResolver};
