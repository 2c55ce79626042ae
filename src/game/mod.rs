//! Game model: arena entities, the simulation systems, and the snapshot they act on.
//!
//! Everything here is synchronous and free of I/O; the server layer decides
//! when to load, tick and store a `GameState`.

pub mod types;
pub mod state;
pub mod entities;
pub mod systems;
