use rand::Rng;

use crate::config::game::{ARENA_WIDTH, WIN_SCORE};
use crate::game::state::GameState;
use crate::game::types::Role;

/// Award a point when the ball leaves through the left or right edge, then serve again.
/// Returns the player who scored.
pub fn apply_scoring<R: Rng + ?Sized>(game_state: &mut GameState, rng: &mut R) -> Option<Role> {
    let scorer = if game_state.ball.past_left_edge() {
        Role::Second
    } else if game_state.ball.past_right_edge(ARENA_WIDTH) {
        Role::First
    } else {
        return None;
    };
    game_state.score.increment(scorer);
    game_state.ball.serve(rng);
    Some(scorer)
}

/// The winner, once a score has reached the threshold.
pub fn check_winner(game_state: &GameState) -> Option<Role> {
    game_state.score.leader_at(WIN_SCORE)
}
