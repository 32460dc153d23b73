//! Plain-text table layout: column sizing, padding, separators.
//!
//! Generic over content. Callers supply header and cell strings (including
//! any margins they want); this layer only measures, pads and joins them.

use unicode_width::UnicodeWidthStr;

/// Gap between columns.
const GUTTER: &str = "  ";

enum Row {
    Cells(Vec<String>),
    Separator,
}

/// An aligned table with a dash-underlined header.
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl TextTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends one row of cells. Missing trailing cells render empty.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(Row::Cells(cells));
    }

    /// Appends a full-width dash row.
    pub fn push_separator(&mut self) {
        self.rows.push(Row::Separator);
    }

    /// Lays the table out as text. Every line ends with a newline; trailing
    /// padding on the last column is trimmed.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        push_line(&mut out, &self.headers, &widths);
        push_dashes(&mut out, &widths);
        for row in &self.rows {
            match row {
                Row::Cells(cells) => push_line(&mut out, cells, &widths),
                Row::Separator => push_dashes(&mut out, &widths),
            }
        }
        out
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            if let Row::Cells(cells) = row {
                for (i, cell) in cells.iter().enumerate() {
                    if i >= widths.len() {
                        widths.push(0);
                    }
                    widths[i] = widths[i].max(cell.width());
                }
            }
        }
        widths
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str(GUTTER);
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        line.push_str(cell);
        for _ in cell.width()..*width {
            line.push(' ');
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn push_dashes(out: &mut String, widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str(GUTTER);
        }
        for _ in 0..*width {
            line.push('-');
        }
    }
    out.push_str(&line);
    out.push('\n');
}
