//! HTTP routes and handlers.
//!
//! Every mutating route resolves an [`Actor`] first, from:
//!   1. `Authorization: Bearer <token>`
//!   2. `x-guest-username` (or `x-username`) and `x-guest-id` headers
//!   3. `username` / `guestId` fields in the JSON body
//!
//! Headers win over body fields. Request bodies are optional except on
//! `place-card`; an empty body reads as `{}`.
//!
//! | Method  | Path                        | Operation      |
//! |---------|-----------------------------|----------------|
//! | `POST`  | `/games`                    | create room    |
//! | `POST`  | `/games/join/:code`         | join by code   |
//! | `GET`   | `/games/:id`                | game state     |
//! | `GET`   | `/games/code/:code`         | game by code   |
//! | `POST`  | `/games/:id/start`          | start          |
//! | `POST`  | `/games/:id/place-card`     | place card     |
//! | `PATCH` | `/games/:id/leave`          | leave          |
//! | `POST`  | `/games/:id/end`            | end early      |
//! | `GET`   | `/health`                   | liveness       |

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use histime_cards::CardSource;
use histime_protocol::{
    Codec, CreateGameRequest, GameId, GameResponse, GameView, GuestFields, JsonCodec,
    PlaceCardRequest, PlaceCardResponse, RoomCode,
};
use histime_room::GameService;
use histime_session::{Actor, Authenticator, Credentials, IdentityResolver, bearer_token};
use histime_store::GameStore;
use serde::de::DeserializeOwned;

use crate::HistimeError;

const GUEST_USERNAME: &str = "x-guest-username";
const USERNAME: &str = "x-username";
const GUEST_ID: &str = "x-guest-id";

/// Shared state behind every handler.
pub struct AppState<S: GameStore, D: CardSource, A: Authenticator> {
    pub service: GameService<S, D>,
    pub identity: IdentityResolver<A>,
}

impl<S: GameStore, D: CardSource, A: Authenticator> AppState<S, D, A> {
    pub fn new(service: GameService<S, D>, identity: IdentityResolver<A>) -> Self {
        Self { service, identity }
    }

    async fn actor(&self, headers: &HeaderMap, guest: &GuestFields) -> Result<Actor, HistimeError> {
        Ok(self.identity.resolve(&credentials(headers, guest)).await?)
    }
}

type Shared<S, D, A> = State<Arc<AppState<S, D, A>>>;

/// Builds the router over shared state.
pub fn router<S, D, A>(state: Arc<AppState<S, D, A>>) -> Router
where
    S: GameStore,
    D: CardSource,
    A: Authenticator,
{
    Router::new()
        .route("/health", get(health))
        .route("/games", post(create_game::<S, D, A>))
        .route("/games/join/:code", post(join_game::<S, D, A>))
        .route("/games/code/:code", get(get_game_by_code::<S, D, A>))
        .route("/games/:id", get(get_game::<S, D, A>))
        .route("/games/:id/start", post(start_game::<S, D, A>))
        .route("/games/:id/place-card", post(place_card::<S, D, A>))
        .route("/games/:id/leave", patch(leave_game::<S, D, A>))
        .route("/games/:id/end", post(end_game::<S, D, A>))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request plumbing
// ---------------------------------------------------------------------------

fn header_str(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Collects identity material from headers, falling back to body fields.
fn credentials(headers: &HeaderMap, guest: &GuestFields) -> Credentials {
    let owned = |name: &str| header_str(headers, name).map(str::to_string);
    Credentials {
        bearer: header_str(headers, header::AUTHORIZATION)
            .and_then(bearer_token)
            .map(str::to_string),
        guest_username: owned(GUEST_USERNAME)
            .or_else(|| owned(USERNAME))
            .or_else(|| guest.username.clone()),
        guest_id: owned(GUEST_ID).or_else(|| guest.guest_id.clone()),
    }
}

/// Decodes a JSON body, reading an empty one as the default value.
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, HistimeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(JsonCodec.decode(body)?)
}

fn game_id(raw: &str) -> Result<GameId, HistimeError> {
    Ok(raw.parse()?)
}

fn room_code(raw: &str) -> Result<RoomCode, HistimeError> {
    Ok(RoomCode::parse(raw)?)
}

fn respond(game: &histime_protocol::Game) -> Json<GameResponse> {
    Json(GameResponse {
        game: GameView::from(game),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_game<S: GameStore, D: CardSource, A: Authenticator>(
    State(state): Shared<S, D, A>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<GameResponse>), HistimeError> {
    let req: CreateGameRequest = optional_body(&body)?;
    let actor = state.actor(&headers, &req.guest).await?;
    let settings = state
        .service
        .rules()
        .settings(req.max_players, req.difficulty, req.categories)?;
    let game = state
        .service
        .create_room(settings, &actor, req.guest.username.as_deref())
        .await?;
    Ok((StatusCode::CREATED, respond(&game)))
}

async fn join_game<S: GameStore, D: CardSource, A: Authenticator>(
    State(state): Shared<S, D, A>,
    Path(code): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GameResponse>, HistimeError> {
    let code = room_code(&code)?;
    let guest: GuestFields = optional_body(&body)?;
    let actor = state.actor(&headers, &guest).await?;
    let game = state
        .service
        .join_by_code(&code, &actor, guest.username.as_deref())
        .await?;
    Ok(respond(&game))
}

async fn get_game<S: GameStore, D: CardSource, A: Authenticator>(
    State(state): Shared<S, D, A>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, HistimeError> {
    let game = state.service.get(game_id(&id)?).await?;
    Ok(respond(&game))
}

async fn get_game_by_code<S: GameStore, D: CardSource, A: Authenticator>(
    State(state): Shared<S, D, A>,
    Path(code): Path<String>,
) -> Result<Json<GameResponse>, HistimeError> {
    let game = state.service.get_by_code(&room_code(&code)?).await?;
    Ok(respond(&game))
}

async fn start_game<S: GameStore, D: CardSource, A: Authenticator>(
    State(state): Shared<S, D, A>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GameResponse>, HistimeError> {
    let id = game_id(&id)?;
    let guest: GuestFields = optional_body(&body)?;
    let actor = state.actor(&headers, &guest).await?;
    let game = state.service.start(id, &actor).await?;
    Ok(respond(&game))
}

async fn place_card<S: GameStore, D: CardSource, A: Authenticator>(
    State(state): Shared<S, D, A>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PlaceCardResponse>, HistimeError> {
    let id = game_id(&id)?;
    let req: PlaceCardRequest = JsonCodec.decode(&body)?;
    let actor = state.actor(&headers, &req.guest).await?;
    let (game, result) = state
        .service
        .place_card(id, &actor, &req.card_id, req.position)
        .await?;
    Ok(Json(PlaceCardResponse {
        game: GameView::from(&game),
        result,
    }))
}

async fn leave_game<S: GameStore, D: CardSource, A: Authenticator>(
    State(state): Shared<S, D, A>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GameResponse>, HistimeError> {
    let id = game_id(&id)?;
    let guest: GuestFields = optional_body(&body)?;
    let actor = state.actor(&headers, &guest).await?;
    let game = state.service.leave(id, &actor).await?;
    Ok(respond(&game))
}

async fn end_game<S: GameStore, D: CardSource, A: Authenticator>(
    State(state): Shared<S, D, A>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GameResponse>, HistimeError> {
    let id = game_id(&id)?;
    let guest: GuestFields = optional_body(&body)?;
    let actor = state.actor(&headers, &guest).await?;
    let game = state.service.end(id, &actor).await?;
    Ok(respond(&game))
}
