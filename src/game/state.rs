use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::config::game::{FIRST_PADDLE_X, SECOND_PADDLE_X};
use crate::game::entities::{Ball, Paddle};
use crate::game::systems::{
    advance_ball, apply_scoring, bounce_off_paddles, bounce_off_walls, check_winner, move_paddle,
};
use crate::game::types::{Direction, Role, Score};

/// Authoritative snapshot of one session's arena.
///
/// Serialized as-is into the `gameState` broadcast and into the state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub first: Paddle,
    pub second: Paddle,
    pub ball: Ball,
    pub score: Score,
}

/// What happened during one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub scorer: Option<Role>,
    pub winner: Option<Role>,
}

impl GameState {
    // Fresh state: paddles at their start, ball centered, score 0-0.
    pub fn new() -> Self {
        GameState {
            first: Paddle::new(FIRST_PADDLE_X),
            second: Paddle::new(SECOND_PADDLE_X),
            ball: Ball::new(),
            score: Score::default(),
        }
    }

    pub fn paddle_mut(&mut self, role: Role) -> Option<&mut Paddle> {
        match role {
            Role::First => Some(&mut self.first),
            Role::Second => Some(&mut self.second),
            Role::Observer => None,
        }
    }

    pub fn apply_move(&mut self, role: Role, direction: Direction) -> bool {
        move_paddle(self, role, direction)
    }

    /// Advance the simulation by one tick.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickReport {
        advance_ball(self);
        bounce_off_walls(self);
        bounce_off_paddles(self);
        let scorer = apply_scoring(self, rng);
        TickReport {
            scorer,
            winner: check_winner(self),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
