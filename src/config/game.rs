/// Game configuration constants.
/// 
/// This module defines the main gameplay parameters such as arena size,
/// paddle and ball geometry, the winning score and the simulation tick.
pub const ARENA_WIDTH: i32 = 600;

/// Height of the arena.
pub const ARENA_HEIGHT: i32 = 400;

pub const PADDLE_WIDTH: i32 = 10;
pub const PADDLE_HEIGHT: i32 = 100;

/// Distance a paddle travels for a single move input.
pub const PADDLE_SPEED: i32 = 20;

/// Horizontal position of each paddle's left edge.
pub const FIRST_PADDLE_X: i32 = 50;
pub const SECOND_PADDLE_X: i32 = 540;

/// Vertical position both paddles start from.
pub const PADDLE_START_Y: i32 = 150;

pub const BALL_RADIUS: i32 = 10;

/// Magnitude of each ball velocity component.
pub const BALL_SPEED: i32 = 3;

/// Score that ends the match.
pub const WIN_SCORE: u32 = 4;

/// Interval between two simulation ticks, in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 30;

/// Number of player slots in a session. Further connections are observers.
pub const MAX_PLAYERS: usize = 2;
