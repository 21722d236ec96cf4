pub mod app;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod ui;
pub mod week;

pub use app::router;
pub use state::AppState;
pub use storage::{load_store, resolve_data_path, KeyValueStore, MemoryStore};
pub use tracker::{ensure_current_week, get_week_state, set_exercise_flag};
pub use week::{Day, WeekKey};
