use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::snapshot::{PressureLevel, Snapshot};

const FILLED: char = '\u{25a0}';
const EMPTY: char = '\u{25a1}';

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Like [`truncate_unicode`], but keeps a short trailing extension
/// (`Very Long Name….app`).
pub fn format_process_name(name: &str, max_width: usize) -> String {
    if name.width() <= max_width {
        return name.to_string();
    }
    if let Some((base, ext)) = name.rsplit_once('.')
        && !base.is_empty()
        && ext.width() + 2 < max_width
    {
        let base_width = max_width - ext.width() - 1;
        let base = truncate_unicode(base, base_width);
        return format!("{base}.{ext}");
    }
    truncate_unicode(name, max_width)
}

fn bar(filled: usize, width: usize) -> String {
    let filled = filled.min(width);
    let mut out = String::with_capacity(width * 3 + 2);
    out.push('[');
    out.extend(std::iter::repeat_n(FILLED, filled));
    out.extend(std::iter::repeat_n(EMPTY, width - filled));
    out.push(']');
    out
}

/// `[■■■■■□□□□□]` for 50%; clamped to `[0, 100]`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let fraction = (percent / 100.0).clamp(0.0, 1.0);
    bar((fraction * width as f64) as usize, width)
}

/// `value_gb` as a fraction of `total_gb`; empty when the total is unknown.
pub fn mini_bar(value_gb: f64, total_gb: f64, width: usize) -> String {
    if total_gb <= 0.0 {
        return bar(0, width);
    }
    let fraction = (value_gb / total_gb).clamp(0.0, 1.0);
    bar((fraction * width as f64) as usize, width)
}

pub fn format_gb(gb: f64) -> String {
    format!("{gb:.2} GB")
}

/// Compact one-line title, e.g. `STRESS  C:91% · M:88%`.
pub fn title_text(snapshot: &Snapshot) -> String {
    let base = format!(
        "C:{:.0}% \u{b7} M:{:.0}%",
        snapshot.cpu_pct, snapshot.mem_pct
    );
    if snapshot.lag_risk {
        format!("STRESS  {base}")
    } else {
        match snapshot.pressure_level {
            PressureLevel::High => format!("HIGH  {base}"),
            PressureLevel::Warn => format!("WARN  {base}"),
            PressureLevel::Ok | PressureLevel::Unknown => base,
        }
    }
}

/// `<pressure> · STRESSED|HEALTHY`. Unknown pressure shows as OK.
pub fn health_summary(snapshot: &Snapshot) -> String {
    let pressure = match snapshot.pressure_level {
        PressureLevel::Unknown => PressureLevel::Ok.label(),
        level => level.label(),
    };
    let state = if snapshot.lag_risk { "STRESSED" } else { "HEALTHY" };
    format!("{pressure} \u{b7} {state}")
}

/// Plain-text summary suitable for pasting into a bug report.
pub fn stats_summary(snapshot: &Snapshot) -> String {
    let mut lines = vec![
        format!(
            "CPU: {:.1}%  RAM: {:.1}%  Swap: {:.1}%",
            snapshot.cpu_pct, snapshot.mem_pct, snapshot.swap_pct
        ),
        format!(
            "Pressure: {}  Lag Risk: {}",
            snapshot.pressure_level.label(),
            if snapshot.lag_risk { "Yes" } else { "No" }
        ),
    ];
    if let Some(m) = &snapshot.platform_memory {
        lines.push(format!(
            "Wired: {:.2} GB  Active: {:.2} GB  Compressed: {:.2} GB  Cached: {:.2} GB",
            m.wired_gb, m.active_gb, m.compressed_gb, m.cached_gb
        ));
    }
    lines.join("\n")
}
