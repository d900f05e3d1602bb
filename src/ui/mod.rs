pub mod header;
pub mod help;
pub mod memory;
pub mod processes;
pub mod selection_bar;
pub mod statusbar;
pub mod theme;


use std::io;
use std::time::Instant;

use crossterm::clipboard::CopyToClipboard;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{DefaultTerminal, Frame};

use crate::app::{App, InputMode, Surface};
use crate::monitor::TickStatus;
use crate::system::host::HostMetrics;
use crate::system::process::RankedProcesses;

pub fn draw<H: HostMetrics>(frame: &mut Frame, app: &App<H>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let empty = RankedProcesses::default();
    let report = app.report.as_ref();
    let snapshot = report.and_then(|r| r.snapshot());
    let processes = report.map_or(&empty, |r| &r.processes);
    let thresholds = app.monitor.thresholds();
    let error = report.and_then(|r| match &r.status {
        TickStatus::Error { reason } => Some(reason.as_str()),
        TickStatus::Sampled { .. } => None,
    });

    header::render(frame, chunks[0], snapshot, processes, thresholds, &app.theme);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(chunks[1]);
    memory::render(frame, body[0], snapshot, &app.theme);
    processes::render(
        frame,
        body[1],
        processes,
        Some(app.selected_index),
        &app.theme,
    );

    selection_bar::render(frame, chunks[2], app.selected_process(), &app.theme);

    let now = Instant::now();
    let view = statusbar::StatusView {
        threshold_input: (app.input_mode == InputMode::EditThresholds)
            .then_some(app.threshold_input.as_str()),
        error,
        message: app.visible_status(now),
        alert: app.alerts.visible(now),
        thresholds,
        keybinds: &app.keybinds,
    };
    statusbar::render(frame, chunks[3], &view, &app.theme);

    if app.help_visible() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}

/// Copies go out as an OSC 52 sequence, which the terminal forwards to the
/// system clipboard.
impl<H: HostMetrics> Surface<H> for DefaultTerminal {
    fn render(&mut self, app: &App<H>) -> io::Result<()> {
        self.draw(|frame| draw(frame, app)).map(|_| ())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> io::Result<()> {
        crossterm::execute!(
            self.backend_mut(),
            CopyToClipboard::to_clipboard_from(text)
        )
    }
}
