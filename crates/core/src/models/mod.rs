//! Data models for GameLayer entities
//!
//! Each module pairs the raw wire records with the view models the dashboard
//! renders.

mod achievement;
mod event;
mod leaderboard;
mod mission;
mod mystery_box;
mod player;
mod prize;
mod streak;
mod survey;

pub use achievement::*;
pub use event::*;
pub use leaderboard::*;
pub use mission::*;
pub use mystery_box::*;
pub use player::*;
pub use prize::*;
pub use streak::*;
pub use survey::*;
