//! Ball physics system.
//!
//! Advances the ball and resolves wall and paddle collisions. Each axis is
//! reflected independently, without energy loss.

use crate::config::game::ARENA_HEIGHT;
use crate::game::state::GameState;

pub fn advance_ball(game_state: &mut GameState) {
    game_state.ball.advance();
}

/// Invert vertical velocity when the ball reaches the top or bottom wall.
pub fn bounce_off_walls(game_state: &mut GameState) {
    if game_state.ball.touches_top_or_bottom(ARENA_HEIGHT) {
        game_state.ball.vy = -game_state.ball.vy;
    }
}

/// Invert horizontal velocity when the ball's center is inside either paddle.
///
/// Only the center point is tested, so a ball grazing a paddle with its
/// radius passes through.
pub fn bounce_off_paddles(game_state: &mut GameState) {
    let ball = game_state.ball;
    if game_state.first.contains(ball.x, ball.y) || game_state.second.contains(ball.x, ball.y) {
        game_state.ball.vx = -game_state.ball.vx;
    }
}
