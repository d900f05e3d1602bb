use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::{format_gb, mini_bar};
use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

const BAR_CELLS: usize = 8;

pub fn render(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Memory ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let breakdown = snapshot.and_then(|s| s.platform_memory.as_ref().map(|m| (s, m)));
    let Some((snapshot, memory)) = breakdown else {
        let line = Line::from(Span::styled(
            "No platform data",
            Style::default().fg(theme.text_secondary),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    };

    let total = snapshot.mem_total_gb;
    let compressed_color = if memory.compression_exceeds_active() {
        theme.health_high
    } else {
        theme.text_primary
    };
    let rows = [
        ("Wired", memory.wired_gb, theme.text_primary),
        ("Active", memory.active_gb, theme.text_primary),
        ("Compressed", memory.compressed_gb, compressed_color),
        ("Cached", memory.cached_gb, theme.text_primary),
    ];

    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, gb, color)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:<11}"),
                    Style::default().fg(theme.text_secondary),
                ),
                Span::styled(mini_bar(gb, total, BAR_CELLS), Style::default().fg(color)),
                Span::styled(format!(" {}", format_gb(gb)), Style::default().fg(color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
