use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::format_process_name;
use crate::system::process::{ProcessSample, RankedProcesses};
use crate::ui::theme::Theme;

/// Width reserved for the percentage column, including padding.
const VALUE_COLUMN: u16 = 8;

#[derive(Debug, Clone, Copy)]
enum Column {
    Cpu,
    Mem,
}

/// `selected` indexes the CPU list followed by the memory list, matching
/// [`RankedProcesses::selectable`].
pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &RankedProcesses,
    selected: Option<usize>,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(36),
            Constraint::Percentage(36),
            Constraint::Percentage(28),
        ])
        .split(area);

    let cpu_len = processes.top_cpu.len();
    let lists = [
        (
            " Top CPU ",
            &processes.top_cpu,
            Column::Cpu,
            selected.filter(|&i| i < cpu_len),
        ),
        (
            " Top Memory ",
            &processes.top_mem,
            Column::Mem,
            selected.and_then(|i| i.checked_sub(cpu_len)),
        ),
        (" GPU ", &processes.tagged, Column::Cpu, None),
    ];
    for (area, (title, samples, column, highlight)) in chunks.iter().zip(lists) {
        render_list(frame, *area, title, samples, column, highlight, theme);
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    samples: &[ProcessSample],
    column: Column,
    highlight: Option<usize>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if samples.is_empty() {
        let line = Line::from(Span::styled(
            "none",
            Style::default().fg(theme.text_secondary),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let name_width = inner.width.saturating_sub(VALUE_COLUMN) as usize;
    let lines: Vec<Line> = samples
        .iter()
        .enumerate()
        .map(|(row, sample)| {
            let value = match column {
                Column::Cpu => sample.cpu_pct,
                Column::Mem => sample.mem_pct,
            };
            let name = format_process_name(&sample.display_name, name_width);
            let line = Line::from(vec![
                Span::styled(
                    format!("{name:<name_width$}"),
                    Style::default().fg(theme.text_primary),
                ),
                Span::styled(
                    format!("{value:>7.1}%"),
                    Style::default().fg(theme.text_secondary),
                ),
            ]);
            if highlight == Some(row) {
                line.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
