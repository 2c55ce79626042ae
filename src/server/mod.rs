//! Server layer root module.
//!
//! This module organizes the coordinator's components:
//! - Application state shared with HTTP/WebSocket handlers
//! - HTTP/WebSocket routing
//! - Game sessions (connections, registry, simulation loop)
//! - The shared state store and the match recorder

pub mod state;
pub mod router;
pub mod game_session;
pub mod store;
pub mod recorder;
pub mod http_error;

#[cfg(test)]
pub(crate) mod test_support;
