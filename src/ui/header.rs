use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::alert::{ThresholdSet, classify};
use crate::format::{format_gb, health_summary, progress_bar, title_text};
use crate::system::process::{GpuActivity, RankedProcesses};
use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

const BAR_CELLS: usize = 10;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&Snapshot>,
    processes: &RankedProcesses,
    thresholds: &ThresholdSet,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_health(frame, chunks[0], snapshot, processes, theme);
    render_usage(frame, chunks[1], snapshot, thresholds, theme);
}

fn bordered(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
}

fn render_health(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&Snapshot>,
    processes: &RankedProcesses,
    theme: &Theme,
) {
    let block = bordered(theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let brand = Span::styled(
        " monarx ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    );

    let Some(snapshot) = snapshot else {
        let lines = vec![
            Line::from(vec![
                brand,
                Span::raw("  "),
                Span::styled(
                    "ERROR",
                    Style::default()
                        .fg(theme.health_high)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                "system counters unavailable",
                Style::default().fg(theme.text_secondary),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
        return;
    };

    let health = theme.health_color(snapshot.pressure_level, snapshot.lag_risk);
    let gpu = GpuActivity::from_tagged(&processes.tagged);
    let lines = vec![
        Line::from(vec![
            brand,
            Span::raw("  "),
            Span::styled(
                title_text(snapshot),
                Style::default().fg(theme.text_primary),
            ),
        ]),
        Line::from(Span::styled(
            health_summary(snapshot),
            Style::default().fg(health).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("Total {}", format_gb(snapshot.mem_total_gb)),
                Style::default().fg(theme.text_secondary),
            ),
            Span::raw("  "),
            Span::styled(
                format!("GPU {}", gpu.label()),
                Style::default().fg(theme.text_secondary),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_usage(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&Snapshot>,
    thresholds: &ThresholdSet,
    theme: &Theme,
) {
    let block = bordered(theme).title(Span::styled(
        " Usage ",
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(snapshot) = snapshot else {
        return;
    };

    let rows = [
        ("CPU ", snapshot.cpu_pct, thresholds.cpu_limit),
        ("RAM ", snapshot.mem_pct, thresholds.mem_limit),
        ("SWAP", snapshot.swap_pct, thresholds.swap_limit),
    ];

    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, value, limit)| {
            let status = classify(value, f64::from(limit), thresholds.warn_factor);
            let color = theme.status_color(status);
            Line::from(vec![
                Span::styled(label, Style::default().fg(theme.text_secondary)),
                Span::raw(" "),
                Span::styled(progress_bar(value, BAR_CELLS), Style::default().fg(color)),
                Span::styled(
                    format!(" {value:>5.1}%"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  limit {limit}%"),
                    Style::default().fg(theme.text_secondary),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
