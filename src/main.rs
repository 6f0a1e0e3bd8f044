//! Binary entry point: resolve configuration, open local storage, hydrate the
//! store, and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use todo_list::{ensure_schema, logging, run_app, App, Config, SqliteRepository, TodoStore};
use tracing::info;

/// Returning a `Result` bubbles fatal initialization problems (an unwritable
/// data directory, a locked database) up to the terminal.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting todo-list");

    let conn = ensure_schema(&config.db_path())?;
    let mut store = TodoStore::new(SqliteRepository::new(conn));
    let outcome = store.load().context("failed to load todos")?;

    let mut app = App::new(store, outcome);
    let result = run_app(&mut app);
    info!(todos = app.store().len(), "exiting");
    result
}
