use std::io::{self, stdout, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

/// Source of operator key presses.
pub trait InputSource {
    /// Waits up to `timeout` for a key press, or forever when `timeout` is `None`.
    /// `Ok(None)` means the wait ended without a key (timeout, resize, mouse).
    fn next_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>>;
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn next_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>> {
        (**self).next_key(timeout)
    }
}

#[derive(Debug, Default)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn next_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>> {
        match timeout {
            Some(timeout) => {
                if !event::poll(timeout)? {
                    return Ok(None);
                }
                Ok(press(event::read()?))
            }
            None => loop {
                if let Some(key) = press(event::read()?) {
                    return Ok(Some(key));
                }
            },
        }
    }
}

fn press(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

static ACTIVE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK: Once = Once::new();

fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
}

// Restores at most once per enter; later calls are no-ops.
fn restore_if_active() -> bool {
    let was_active = ACTIVE.swap(false, Ordering::SeqCst);
    if was_active {
        restore();
    }
    was_active
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        // Restore before the default hook prints the panic message
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_if_active();
            previous(info);
        }));
    });
}

/// Holds the terminal in raw mode on the alternate screen; restores it on drop.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("failed enabling raw mode")?;
        let guard_on_error = |e: anyhow::Error| {
            restore();
            e
        };
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)
            .context("failed entering alternate screen")
            .map_err(guard_on_error)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))
            .context("failed creating terminal")
            .map_err(guard_on_error)?;

        install_panic_hook();
        ACTIVE.store(true, Ordering::SeqCst);

        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_if_active();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_is_skipped_when_inactive() {
        assert!(!restore_if_active());
        assert!(!restore_if_active());
    }

    #[test]
    fn test_panic_hook_installs_once() {
        install_panic_hook();
        install_panic_hook();
        assert!(PANIC_HOOK.is_completed());
    }
}
