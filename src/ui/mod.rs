//! Ratatui shell: menu bar, student table, modal editor, confirmation prompt,
//! search bar, and status footer. It only calls into the roster controller
//! and renders what comes back.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
