//! Binary entry point: resolve the data directory, load settings, start file
//! logging, make sure the `students` table exists, and drive the Ratatui event
//! loop until the user exits.
use anyhow::Context;
use student_roster::config::{self, Config};
use student_roster::{ensure_schema, logging, run_app, App, SqliteStore};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let data_dir = config::data_dir()?;
    let config = Config::load(&data_dir)?;
    logging::init(&config.log_path(&data_dir), &config.log_level)?;

    let db_path = config.database_path(&data_dir);
    ensure_schema(&db_path)
        .with_context(|| format!("failed to prepare database at {}", db_path.display()))?;
    info!(path = %db_path.display(), "database ready");

    let mut app = App::new(Box::new(SqliteStore::new(db_path)))?;
    run_app(&mut app)
}
