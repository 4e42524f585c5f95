use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::warn;

use crate::config::MonitorConfig;
use crate::manager::operations::Terminator;
use crate::manager::{Sampler, Snapshot};
use crate::process::ProcessSample;
use crate::tui::render::{self, FrameModel, Thresholds};
use crate::tui::terminal::InputSource;
use crate::tui::view::{page_size, Navigation, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Running,
    ConfirmingKill { pid: u32, command: String },
    Exiting,
}

#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub refresh: Duration,
    pub thresholds: Thresholds,
}

impl From<&MonitorConfig> for Settings {
    fn from(config: &MonitorConfig) -> Self {
        Settings {
            refresh: Duration::from_millis(config.refresh_ms),
            thresholds: Thresholds {
                high: config.high_threshold,
                medium: config.medium_threshold,
            },
        }
    }
}

enum Action {
    Quit,
    Kill,
    Navigate(Navigation),
    Idle,
}

fn running_action(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        KeyCode::Char('k') | KeyCode::Char('K') => Action::Kill,
        KeyCode::Up => Action::Navigate(Navigation::Up),
        KeyCode::Down => Action::Navigate(Navigation::Down),
        KeyCode::Home => Action::Navigate(Navigation::Home),
        KeyCode::End => Action::Navigate(Navigation::End),
        KeyCode::PageUp => Action::Navigate(Navigation::PageUp),
        KeyCode::PageDown => Action::Navigate(Navigation::PageDown),
        // 'r' and everything else: the next tick resamples anyway
        _ => Action::Idle,
    }
}

fn confirms(key: Option<&KeyEvent>) -> bool {
    matches!(
        key.map(|k| k.code),
        Some(KeyCode::Char('y')) | Some(KeyCode::Char('Y'))
    )
}

/// The monitor's render loop: sample, derive, rank, render, then poll input.
pub struct App<S, I, T> {
    sampler: S,
    input: I,
    terminator: T,
    settings: Settings,
    view: ViewState,
    mode: Mode,
    notice: Option<String>,
}

impl<S: Sampler, I: InputSource, T: Terminator> App<S, I, T> {
    pub fn new(sampler: S, input: I, terminator: T, settings: Settings) -> Self {
        App {
            sampler,
            input,
            terminator,
            settings,
            view: ViewState::new(),
            mode: Mode::Running,
            notice: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn terminator(&self) -> &T {
        &self.terminator
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.mode != Mode::Exiting {
            self.tick(terminal)?;
        }
        Ok(())
    }

    /// One iteration of the `Running` state, including any kill confirmation
    /// it leads into.
    pub fn tick<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let snapshot = self.sampler.sample();
        self.view.clamp(snapshot.len());

        let height = terminal.size().context("failed reading terminal size")?.height;
        let page = page_size(height);
        self.draw(terminal, &snapshot, None)?;

        let key = self
            .input
            .next_key(Some(self.settings.refresh))
            .context("failed polling terminal input")?;
        let Some(key) = key else {
            return Ok(());
        };

        match running_action(&key) {
            Action::Quit => self.mode = Mode::Exiting,
            Action::Kill => {
                let target = self
                    .view
                    .selected(snapshot.len())
                    .and_then(|i| snapshot.get(i));
                if let Some(target) = target {
                    self.confirm_kill(terminal, &snapshot, target)?;
                }
            }
            Action::Navigate(nav) => self.view.apply(nav, snapshot.len(), page),
            Action::Idle => {}
        }
        Ok(())
    }

    // Blocks without a timeout: a destructive action waits for an explicit answer.
    fn confirm_kill<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        snapshot: &Snapshot,
        target: &ProcessSample,
    ) -> Result<()> {
        self.mode = Mode::ConfirmingKill {
            pid: target.pid,
            command: target.command.clone(),
        };
        self.notice = None;
        self.draw(terminal, snapshot, Some(target))?;

        let answer = self
            .input
            .next_key(None)
            .context("failed reading confirmation")?;
        if confirms(answer.as_ref()) {
            self.notice = Some(match self.terminator.terminate(target.pid) {
                Ok(signal) => format!("Sent {} to {}", signal, target.pid),
                Err(e) => {
                    warn!(pid = target.pid, "termination failed: {}", e);
                    e.to_string()
                }
            });
        }

        self.mode = Mode::Running;
        Ok(())
    }

    fn draw<B: Backend>(
        &self,
        terminal: &mut Terminal<B>,
        snapshot: &Snapshot,
        confirming: Option<&ProcessSample>,
    ) -> Result<()> {
        let model = FrameModel {
            snapshot,
            view: &self.view,
            thresholds: self.settings.thresholds,
            notice: self.notice.as_deref(),
            confirming,
        };
        terminal
            .draw(|frame| render::draw(frame, &model))
            .context("failed drawing frame")?;
        Ok(())
    }
}
