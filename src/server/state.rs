//! Application state for the backend server.
//!
//! Holds the handles every WebSocket handler needs: the session store and the
//! session registry actor.

use actix::Addr;
use crate::server::game_session::SessionRegistry;
use crate::server::store::SessionStore;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Typed access to the shared state store.
    pub store: SessionStore,
    /// Address of the session registry actor (broadcast groups, simulation loops).
    pub registry: Addr<SessionRegistry>,
}

impl AppState {
    pub fn new(store: SessionStore, registry: Addr<SessionRegistry>) -> Self {
        AppState { store, registry }
    }
}
