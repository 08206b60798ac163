//! GameLayer Engine - player state, leaderboard polling, actions and the mystery wheel

pub mod aggregator;
pub mod dispatcher;
pub mod leaderboard;
pub mod mystery;
pub mod session;

pub use aggregator::{load_player_state, PlayerSnapshot, Slice, SliceFailure};
pub use dispatcher::{ActionDispatcher, ActionTracker};
pub use leaderboard::{
    spawn_leaderboard_poller, LeaderboardBoard, LeaderboardPoller, LeaderboardPollerHandle,
    LeaderboardState,
};
pub use mystery::{MysteryBoxSession, SpinAnimation};
pub use session::{Dashboard, PlayerView};
