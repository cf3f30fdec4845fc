//! callcrm TUI: ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::{App, Preload};

/// Start the TUI, ingesting `preload` before the first frame.
///
/// Preload failures do not stop startup; they are shown on the status line.
pub fn run(config: callcrm_core::config::Config, preload: Preload) -> anyhow::Result<()> {
    let theme = theme::Theme::load_default();
    let mut app = App::new(callcrm_core::CallStore::new(), config, theme)?;
    app.state_mut().apply_preload(&preload);
    tracing::info!(records = app.state().store.len(), "tui starting");
    app.run()
}
