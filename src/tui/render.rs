//! Draws one full-screen frame from a snapshot.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::manager::system::SystemStats;
use crate::manager::Snapshot;
use crate::process::ProcessSample;
use crate::tui::view::{page_size, ViewState};

const KEY_LEGEND: &str = "Press q:Quit k:Kill r:Refresh";

/// Utilization classes used to color table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    High,
    Medium,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 50.0,
            medium: 20.0,
        }
    }
}

impl Thresholds {
    pub fn classify(&self, sample: &ProcessSample) -> Usage {
        let peak = sample.cpu_percent.max(sample.mem_percent);
        if peak >= self.high {
            Usage::High
        } else if peak >= self.medium {
            Usage::Medium
        } else {
            Usage::Normal
        }
    }
}

fn usage_style(usage: Usage) -> Style {
    match usage {
        Usage::High => Style::default().fg(Color::Red),
        Usage::Medium => Style::default().fg(Color::Yellow),
        Usage::Normal => Style::default().fg(Color::Cyan),
    }
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn bar_style() -> Style {
    Style::default().fg(Color::White).bg(Color::Blue)
}

// Column offsets: PID 0, CPU% 8, MEM% 15, MEM(MB) 22, COMMAND 32.
pub fn format_header() -> String {
    format!("{:>5}   {:<5}  {:<5}  {:<7}   {}", "PID", "CPU%", "MEM%", "MEM(MB)", "COMMAND")
}

pub fn format_row(sample: &ProcessSample) -> String {
    format!(
        "{:>5}   {:>5.1}  {:>5.1}  {:>7}   {}",
        sample.pid, sample.cpu_percent, sample.mem_percent, sample.vsize_mb, sample.command
    )
}

pub fn status_line(stats: Option<&SystemStats>) -> String {
    format!(
        " LightLimit Monitor | {} | {} | {}",
        SystemStats::cpu_label(stats),
        SystemStats::mem_label(stats),
        KEY_LEGEND
    )
}

pub fn footer_line(snapshot: &Snapshot, view: &ViewState, notice: Option<&str>) -> String {
    let selected = view
        .selected(snapshot.len())
        .and_then(|i| snapshot.get(i))
        .map(|s| format!("{} ({})", s.pid, s.command))
        .unwrap_or_else(|| "none".to_string());
    let mut line = format!(" Processes: {} | Selected: {}", snapshot.len(), selected);
    if let Some(notice) = notice {
        line.push_str(" | ");
        line.push_str(notice);
    }
    line
}

pub fn kill_prompt(sample: &ProcessSample) -> String {
    format!(" Kill process {} ({})? (y/n)", sample.pid, sample.command)
}

/// Everything a frame needs; borrowed from the render loop for one draw.
pub struct FrameModel<'a> {
    pub snapshot: &'a Snapshot,
    pub view: &'a ViewState,
    pub thresholds: Thresholds,
    pub notice: Option<&'a str>,
    pub confirming: Option<&'a ProcessSample>,
}

fn row_rect(area: Rect, y: u16) -> Option<Rect> {
    (y < area.height).then(|| Rect::new(area.x, area.y + y, area.width, 1))
}

fn put(frame: &mut Frame, area: Rect, y: u16, text: String, style: Style) {
    if let Some(rect) = row_rect(area, y) {
        frame.render_widget(Paragraph::new(Line::from(text)).style(style), rect);
    }
}

pub fn draw(frame: &mut Frame, model: &FrameModel) {
    let area = frame.size();
    let page = page_size(area.height);

    put(frame, area, 0, status_line(model.snapshot.stats.as_ref()), bar_style());
    put(
        frame,
        area,
        1,
        format_header(),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    );
    put(
        frame,
        area,
        2,
        "-".repeat(area.width as usize),
        Style::default().add_modifier(Modifier::BOLD),
    );

    let selected = model.view.selected(model.snapshot.len());
    let start = model.view.viewport_start(page);
    for (offset, sample) in model.snapshot.samples.iter().skip(start).take(page).enumerate() {
        let style = if selected == Some(start + offset) {
            selected_style()
        } else {
            usage_style(model.thresholds.classify(sample))
        };
        put(frame, area, 3 + offset as u16, format_row(sample), style);
    }

    if let Some(sample) = model.confirming {
        if area.height >= 3 {
            put(
                frame,
                area,
                area.height - 3,
                kill_prompt(sample),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            );
        }
    }

    if area.height > 3 {
        put(
            frame,
            area,
            area.height - 1,
            footer_line(model.snapshot, model.view, model.notice),
            bar_style(),
        );
    }
}
