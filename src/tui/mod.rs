pub mod app;
pub mod render;
pub mod terminal;
pub mod view;

use anyhow::Result;
use tracing::info;

use crate::config::MonitorConfig;
use crate::manager::operations::SignalTerminator;
use crate::manager::Manager;
use app::{App, Settings};
use terminal::{CrosstermInput, TerminalGuard};

/// Runs the interactive monitor until the operator quits.
/// The terminal is restored on every exit path, including errors.
pub fn run_monitor(manager: Manager, config: &MonitorConfig) -> Result<()> {
    info!(
        user = %manager.active_user.name,
        admin = manager.active_user.is_admin(),
        root = %manager.proc_root.display(),
        "starting monitor"
    );
    let mut guard = TerminalGuard::enter()?;
    let mut app = App::new(manager, CrosstermInput, SignalTerminator, Settings::from(config));
    app.run(guard.terminal())
}
