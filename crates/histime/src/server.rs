//! `HistimeServer` builder and server loop.
//!
//! This is the entry point for running a History Time server. It ties
//! together all the layers: HTTP → identity → game service → store/cards.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use histime_cards::CardSource;
use histime_room::{GameRules, GameService};
use histime_session::{Authenticator, IdentityConfig, IdentityResolver};
use histime_store::GameStore;
use tokio::net::TcpListener;

use crate::{AppState, HistimeError, router};

/// Builder for configuring and starting a History Time server.
///
/// # Example
///
/// ```rust,ignore
/// use histime::prelude::*;
///
/// let server = HistimeServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .rules(GameRules { hand_size: 4, ..GameRules::default() })
///     .build(MemoryStore::new(), CardDeck::builtin(), TokenTable::new())
///     .await?;
/// server.run().await
/// ```
pub struct HistimeServerBuilder {
    bind_addr: String,
    rules: GameRules,
    identity: IdentityConfig,
}

impl HistimeServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            rules: GameRules::default(),
            identity: IdentityConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the game rules.
    pub fn rules(mut self, rules: GameRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the guest identity configuration.
    pub fn identity_config(mut self, config: IdentityConfig) -> Self {
        self.identity = config;
        self
    }

    /// Binds the listener and assembles the server.
    ///
    /// # Errors
    /// Returns [`HistimeError::Io`] if the address can't be bound.
    pub async fn build<S, D, A>(
        self,
        store: S,
        cards: D,
        auth: A,
    ) -> Result<HistimeServer<S, D, A>, HistimeError>
    where
        S: GameStore,
        D: CardSource,
        A: Authenticator,
    {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        let state = Arc::new(AppState::new(
            GameService::new(store, cards, self.rules),
            IdentityResolver::new(auth, self.identity),
        ));
        Ok(HistimeServer { listener, state })
    }
}

impl Default for HistimeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound History Time server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct HistimeServer<S: GameStore, D: CardSource, A: Authenticator> {
    listener: TcpListener,
    state: Arc<AppState<S, D, A>>,
}

impl<S, D, A> HistimeServer<S, D, A>
where
    S: GameStore,
    D: CardSource,
    A: Authenticator,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared state, for inspecting games from outside a request.
    pub fn state(&self) -> &Arc<AppState<S, D, A>> {
        &self.state
    }

    /// The router this server serves.
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.state))
    }

    /// Serves requests until the process is terminated.
    pub async fn run(self) -> Result<(), HistimeError> {
        self.run_until(std::future::pending()).await
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight
    /// requests and returns.
    pub async fn run_until(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), HistimeError> {
        let app = self.router();
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(%addr, "History Time server running");
        }
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("History Time server stopped");
        Ok(())
    }
}
