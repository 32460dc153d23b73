//! Table rendering and viewport cropping.
//!
//! `render_status` is the whole per-refresh pipeline as one pure function:
//! the interactive loop and the one-shot piped mode both go through it, so
//! identical input always yields identical output.

use unicode_width::UnicodeWidthChar;

use crate::error::Error;
use crate::row::{ProcessRow, project};
use crate::sort::{SortSpec, sort_rows};
use crate::status::parse_status;
use crate::table::TextTable;

/// Fixed column order of the dashboard.
pub const COLUMNS: [&str; 8] = ["host", "port", "cpu%", "mem%", "iops", "net", "class", "roles"];

/// Renders sorted rows as an aligned table.
///
/// The active sort's column header is wrapped in angle brackets. When the
/// spec groups by host, repeated host values are blanked and a separator
/// row precedes every host change after the first group.
pub fn format_table(rows: &[ProcessRow], spec: &SortSpec) -> String {
    let headers = COLUMNS
        .iter()
        .map(|name| {
            if *name == spec.name {
                format!("<{}>", name)
            } else {
                name.to_string()
            }
        })
        .collect();
    let mut table = TextTable::new(headers);

    let mut last_host: Option<&str> = None;
    for row in rows {
        let mut host_cell = row.host.as_str();
        if spec.group {
            match last_host {
                Some(prev) if prev == row.host => host_cell = "",
                Some(_) => {
                    table.push_separator();
                    last_host = Some(&row.host);
                }
                None => last_host = Some(&row.host),
            }
        }
        table.push_row(vec![
            margin(host_cell),
            margin(&row.port),
            margin(&row.cpu_pct.to_string()),
            margin(&row.mem_pct.to_string()),
            margin(&row.iops.to_string()),
            margin(&row.net.to_string()),
            margin(&row.class),
            margin(&row.roles),
        ]);
    }
    table.render()
}

/// One-space margin on both sides of a cell.
fn margin(value: &str) -> String {
    format!(" {} ", value)
}

/// Crops rendered text to the viewport: every line truncated and padded to
/// exactly `width` visible columns, the block truncated and padded with
/// blank lines to exactly `height` lines. A redraw of the result fully
/// overwrites whatever was on screen before.
pub fn crop(text: &str, width: usize, height: usize) -> String {
    let mut lines: Vec<String> = text.lines().take(height).map(|l| fit(l, width)).collect();
    while lines.len() < height {
        lines.push(" ".repeat(width));
    }
    lines.join("\n")
}

/// Truncates to at most `width` display columns, then pads to exactly it.
fn fit(line: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    for _ in used..width {
        out.push(' ');
    }
    out
}

/// The full refresh pipeline: parse, project, sort, render.
pub fn render_status(input: &str, spec: &SortSpec, show_all_iops: bool) -> Result<String, Error> {
    let status = parse_status(input)?;
    let mut rows = project(&status, show_all_iops);
    sort_rows(&mut rows, spec);
    Ok(format_table(&rows, spec))
}
