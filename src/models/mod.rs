//! Data models for the SkillSwap application.
//!
//! Field names follow the snake_case JSON the frontend already consumes.

mod feedback;
mod skill;
mod swap;
mod user;

pub use feedback::*;
pub use skill::*;
pub use swap::*;
pub use user::*;
