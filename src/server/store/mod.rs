//! Shared state store.
//!
//! Every piece of session state the coordinator mutates (slot assignment, game
//! snapshot, running flag) lives behind this store, keyed by room code. Handlers
//! never share game state by reference: they read, modify and write it back
//! through the `StateStore` actor, so the storage can sit outside the process.
//!
//! - `backend`: the raw key/value contract and the in-memory implementation
//! - `actor`: the `StateStore` actor serializing requests to a backend
//! - `session_store`: typed per-session operations used by the game session layer

pub mod actor;
pub mod backend;
pub mod session_store;

use actix::MailboxError;
use thiserror::Error;

pub use actor::StateStore;
pub use backend::MemoryBackend;
#[cfg(test)]
pub use backend::KvBackend;
pub use session_store::SessionStore;

/// Failure of a single store operation. Never fatal: callers abort the
/// operation in progress and carry on.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused or failed the request. The in-memory backend never does.
    #[cfg(test)]
    #[error("Store backend error: {0}")]
    Backend(String),

    /// The store actor did not answer (stopped, mailbox full, or timed out).
    #[error("Store unreachable: {0}")]
    Mailbox(#[from] MailboxError),

    /// A stored value could not be encoded or decoded.
    #[error("Failed to encode or decode stored value: {0}")]
    Codec(#[from] serde_json::Error),

    /// Compare-and-set kept losing against concurrent writers.
    #[error("Too much contention on key {key}")]
    Contention { key: String },
}
