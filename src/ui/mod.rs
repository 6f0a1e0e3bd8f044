//! Ratatui front-end: an entry row, the list, and a footer. All list changes
//! go through the store; this layer only maps keys to store calls and draws.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
