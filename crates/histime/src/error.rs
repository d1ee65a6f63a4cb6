//! Unified error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use histime_cards::CardError;
use histime_protocol::{ErrorBody, ProtocolError};
use histime_room::GameError;
use histime_session::IdentityError;
use histime_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// Handlers return `Result<_, HistimeError>`; `?` converts the sub-crate
/// errors, and [`IntoResponse`] turns the result into a status code and an
/// [`ErrorBody`].
#[derive(Debug, thiserror::Error)]
pub enum HistimeError {
    /// No usable actor on the request.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A game operation failed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A path segment or body could not be parsed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Binding or serving the listener failed.
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for HistimeError {
    fn from(err: StoreError) -> Self {
        Self::Game(err.into())
    }
}

impl From<CardError> for HistimeError {
    fn from(err: CardError) -> Self {
        Self::Game(err.into())
    }
}

impl HistimeError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Identity(_) => StatusCode::UNAUTHORIZED,
            Self::Game(err) => game_status(err),
            // A malformed id or code can never resolve to a game.
            Self::Protocol(ProtocolError::InvalidGameId(_) | ProtocolError::InvalidRoomCode(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Protocol(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Identity(_) => "unauthorized",
            Self::Game(err) => err.code(),
            Self::Protocol(ProtocolError::InvalidGameId(_) | ProtocolError::InvalidRoomCode(_)) => {
                "not_found"
            }
            Self::Protocol(_) => "bad_request",
            Self::Io(_) => "internal",
        }
    }
}

fn game_status(err: &GameError) -> StatusCode {
    match err {
        GameError::GameNotFound(_) | GameError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        GameError::NotHost | GameError::NotYourTurn => StatusCode::FORBIDDEN,
        GameError::InvalidState { .. }
        | GameError::GameFull { .. }
        | GameError::DuplicatePlayer(_)
        | GameError::InsufficientPlayers { .. }
        | GameError::CardNotInHand(_)
        | GameError::PositionOccupied(_)
        | GameError::InvalidPosition { .. }
        | GameError::PlayerNotFound
        | GameError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        GameError::Store(StoreError::VersionConflict { .. }) => StatusCode::CONFLICT,
        GameError::Cards(_) => StatusCode::BAD_GATEWAY,
        GameError::RoomAllocation { .. } | GameError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for HistimeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
