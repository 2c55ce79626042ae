//! Game session layer: connections, the session registry and the simulation loop.
//!
//! - `session`: WebSocket actor of one client
//! - `lifecycle`: join, input and leave flows against the store
//! - `server`: `SessionRegistry`, broadcast groups and loop ownership
//! - `match_loop`: the per-session simulation actor
//! - `slots`: role assignment by slot position
//! - `messages`: wire frames and actor messages

pub mod lifecycle;
pub mod match_loop;
pub mod messages;
pub mod server;
pub mod session;
pub mod slots;

pub use server::SessionRegistry;
