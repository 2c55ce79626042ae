//! Game entities module.
//!
//! This module organizes paddle and ball entity logic.

pub mod paddle;
pub mod ball;

pub use paddle::*;
pub use ball::*;
