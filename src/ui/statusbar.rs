use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::alert::ThresholdSet;
use crate::app::{FeedEntry, ResolvedKeybinds, StatusMessage};
use crate::ui::theme::Theme;

/// Everything the status bar can show. Higher fields win.
pub struct StatusView<'a> {
    /// Text typed so far, while the threshold prompt is open.
    pub threshold_input: Option<&'a str>,
    pub error: Option<&'a str>,
    pub message: Option<&'a StatusMessage>,
    pub alert: Option<&'a FeedEntry>,
    pub thresholds: &'a ThresholdSet,
    pub keybinds: &'a ResolvedKeybinds,
}

pub fn render(frame: &mut Frame, area: Rect, view: &StatusView, theme: &Theme) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    let line = if let Some(input) = view.threshold_input {
        prompt_line(input, view, theme)
    } else if let Some(reason) = view.error {
        Line::from(Span::styled(
            format!(" ERROR  {reason}"),
            Style::default()
                .fg(theme.health_high)
                .add_modifier(Modifier::BOLD),
        ))
    } else if let Some(message) = view.message {
        message_line(message, theme)
    } else if let Some(entry) = view.alert {
        Line::from(vec![
            Span::styled(
                format!(" {} ", entry.title),
                Style::default()
                    .fg(theme.pill_key_fg)
                    .bg(theme.health_warn)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", entry.message),
                Style::default().fg(theme.pill_desc_fg),
            ),
        ])
    } else {
        idle_line(view, theme)
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn message_line<'a>(message: &StatusMessage, theme: &Theme) -> Line<'a> {
    let color = if message.is_error {
        theme.health_high
    } else {
        theme.health_ok
    };
    Line::from(Span::styled(
        format!(" {}", message.text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn prompt_line<'a>(input: &str, view: &StatusView, theme: &Theme) -> Line<'a> {
    let mut spans = vec![
        Span::styled(
            " CPU MEM SWAP ",
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {input}"), Style::default().fg(theme.pill_desc_fg)),
        Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
    ];
    spans.extend(pill_spans("Esc", "Cancel", theme));
    spans.extend(pill_spans("Enter", "Save", theme));
    if let Some(message) = view.message.filter(|m| m.is_error) {
        spans.push(Span::raw(" "));
        spans.extend(message_line(message, theme).spans);
    }
    Line::from(spans)
}

fn idle_line<'a>(view: &StatusView, theme: &Theme) -> Line<'a> {
    let kb = view.keybinds;
    let mut spans = Vec::new();
    for (code, desc) in [
        (kb.quit, "Quit"),
        (kb.refresh, "Refresh"),
        (kb.copy_stats, "Copy"),
        (kb.edit_thresholds, "Limits"),
        (kb.kill, "Kill"),
        (kb.help, "Help"),
    ] {
        spans.extend(pill_spans(&key_text(code), desc, theme));
    }
    let t = view.thresholds;
    spans.push(Span::styled(
        format!(
            "  CPU>{}% MEM>{}% SWAP>{}% warn x{:.2}",
            t.cpu_limit, t.mem_limit, t.swap_limit, t.warn_factor
        ),
        Style::default().fg(theme.text_secondary),
    ));
    Line::from(spans)
}

fn key_text(code: crossterm::event::KeyCode) -> String {
    match code {
        crossterm::event::KeyCode::Char(c) => c.to_string(),
        _ => "?".to_string(),
    }
}

fn pill_spans<'a>(key: &str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
