//! Paddle movement system.
//!
//! This module handles moving a player's paddle inside the arena.

use crate::config::game::ARENA_HEIGHT;
use crate::game::state::GameState;
use crate::game::types::{Direction, Role};

/// Move the paddle owned by `role` one step in the given direction.
/// Observers own no paddle. Returns true if the paddle moved.
pub fn move_paddle(game_state: &mut GameState, role: Role, direction: Direction) -> bool {
    match game_state.paddle_mut(role) {
        Some(paddle) => paddle.step(direction, ARENA_HEIGHT),
        None => false,
    }
}
