pub mod movement;
pub mod physics;
pub mod rules;

pub use movement::*;
pub use physics::*;
pub use rules::*;
