pub mod app;
pub mod calendar;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod profile;
pub mod storage;
pub mod streak;
pub mod tiers;
pub mod state;

pub use app::router;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path, KeyValueStore};
pub use streak::{load_streak, Loaded, StreakTracker};
