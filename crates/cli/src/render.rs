//! Plain-text table rendering for `list`.

use chrono::DateTime;
use patterning_core::{PatternRecord, viewer_url};

const MAX_CELL_CHARS: usize = 40;
const HEADERS: [&str; 6] = ["Date", "Word", "Voicing", "Essence", "Image", "View"];

/// `YYYY-MM-DD HH:MM` when the timestamp parses, otherwise the raw string.
fn format_date(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map_or_else(|_| created_at.to_owned(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

fn cell(text: &str) -> String {
    let text = text.replace(['\n', '\r', '\t'], " ");
    if text.chars().count() <= MAX_CELL_CHARS {
        return text;
    }
    let mut short: String = text.chars().take(MAX_CELL_CHARS.saturating_sub(1)).collect();
    short.push('…');
    short
}

pub(crate) fn render_table(records: &[PatternRecord], viewer_base: &str) -> String {
    if records.is_empty() {
        return "No patterns found.\n".to_owned();
    }

    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            [
                format_date(&r.created_at),
                cell(&r.word),
                cell(&r.voicing),
                cell(&r.essence),
                if r.image_url.is_empty() { "-".to_owned() } else { cell(&r.image_url) },
                viewer_url(viewer_base, &r.id),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS.iter().map(|h| (*h).to_owned()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, values: &[String], widths: &[usize]) {
    let line: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let pad = width.saturating_sub(value.chars().count());
            format!("{value}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
