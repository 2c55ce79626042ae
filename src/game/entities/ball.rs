//! Ball entity logic.
//!
//! Position and velocity are integers in arena units; velocity is applied once per tick.

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::config::game::{ARENA_HEIGHT, ARENA_WIDTH, BALL_RADIUS, BALL_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub vx: i32,
    pub vy: i32,
}

impl Ball {
    /// A ball at the arena center heading down-right.
    pub fn new() -> Self {
        Self {
            x: ARENA_WIDTH / 2,
            y: ARENA_HEIGHT / 2,
            radius: BALL_RADIUS,
            vx: BALL_SPEED,
            vy: BALL_SPEED,
        }
    }

    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    /// Put the ball back at the center with a random diagonal direction.
    pub fn serve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.x = ARENA_WIDTH / 2;
        self.y = ARENA_HEIGHT / 2;
        self.vx = if rng.random_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
        self.vy = if rng.random_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
    }

    pub fn touches_top_or_bottom(&self, arena_height: i32) -> bool {
        self.y - self.radius <= 0 || self.y + self.radius >= arena_height
    }

    pub fn past_left_edge(&self) -> bool {
        self.x - self.radius <= 0
    }

    pub fn past_right_edge(&self, arena_width: i32) -> bool {
        self.x + self.radius >= arena_width
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}
