//! Paddle entity logic.

use serde::{Serialize, Deserialize};

use crate::config::game::{PADDLE_HEIGHT, PADDLE_SPEED, PADDLE_START_Y, PADDLE_WIDTH};
use crate::game::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub speed: i32,
}

impl Paddle {
    /// Create a paddle at the given column, vertically at its start position.
    pub fn new(x: i32) -> Self {
        Self {
            x,
            y: PADDLE_START_Y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
        }
    }

    /// Highest `y` the paddle may take inside an arena of the given height.
    pub fn max_y(&self, arena_height: i32) -> i32 {
        (arena_height - self.height).max(0)
    }

    /// Move one step in `direction`, clamped to `[0, arena_height - height]`.
    /// Returns true if the paddle actually moved.
    pub fn step(&mut self, direction: Direction, arena_height: i32) -> bool {
        let previous = self.y;
        self.y = match direction {
            Direction::Up => self.y - self.speed,
            Direction::Down => self.y + self.speed,
        }
        .clamp(0, self.max_y(arena_height));
        self.y != previous
    }

    /// Strict point-in-rectangle test against the paddle's area.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x < x && x < self.x + self.width && self.y < y && y < self.y + self.height
    }
}
