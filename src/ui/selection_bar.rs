use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::truncate_unicode;
use crate::system::process::ProcessSample;
use crate::ui::theme::Theme;

/// One line naming the process the kill key would target.
pub fn render(frame: &mut Frame, area: Rect, selected: Option<&ProcessSample>, theme: &Theme) {
    let style = Style::default()
        .bg(theme.statusbar_bg)
        .fg(theme.text_primary);
    let width = area.width as usize;
    let line = match selected {
        Some(sample) => format_selection_line(sample, width),
        None => " ".repeat(width),
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, style))).style(style),
        area,
    );
}

fn format_selection_line(sample: &ProcessSample, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut usage = format!("CPU {:.1}%  MEM {:.1}%", sample.cpu_pct, sample.mem_pct);
    if usage.width() > width {
        usage = truncate_unicode(&usage, width);
        let pad = width.saturating_sub(usage.width());
        return format!("{}{}", " ".repeat(pad), usage);
    }

    let usage_width = usage.width();
    let left_capacity = width.saturating_sub(usage_width + 1);
    let label = format!("{} (PID {})", sample.raw_name, sample.pid);
    let label = truncate_unicode(&label, left_capacity);
    let gap = width.saturating_sub(label.width() + usage_width);
    format!("{label}{}{usage}", " ".repeat(gap))
}
