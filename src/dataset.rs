//! The in-memory tabular value passed between decode and encode.
//!
//! A [`Dataset`] is an ordered sequence of rows of string cells plus an
//! optional header row. It is owned by one conversion at a time, built by
//! a codec's decode and consumed by a codec's encode, or rendered as a
//! human-readable table for the console.

use serde::{Deserialize, Serialize};

/// Console table rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Header underlined with dashes (default)
    #[default]
    Simple,

    /// Full ASCII borders around every row
    Grid,

    /// Columns aligned, no decoration
    Plain,
}

impl TableStyle {
    /// Returns the style's name.
    pub fn name(&self) -> &'static str {
        match self {
            TableStyle::Simple => "simple",
            TableStyle::Grid => "grid",
            TableStyle::Plain => "plain",
        }
    }
}

impl std::fmt::Display for TableStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered table of string cells with an optional header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    headers: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Creates an empty dataset with no headers and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header row.
    #[must_use]
    pub fn with_headers(mut self, headers: Vec<String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Replaces the header row in place.
    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = Some(headers);
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Returns the header row, if declared.
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Returns the data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of data rows (headers excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the dataset has no rows *and* no declared
    /// columns. A header-only dataset is not empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.headers.as_ref().map_or(true, |h| h.is_empty())
    }

    /// Returns the column count: the header width if headers are
    /// declared, otherwise the widest row.
    pub fn width(&self) -> usize {
        match &self.headers {
            Some(h) => h.len(),
            None => self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Returns the cell at `(row, col)`, treating ragged rows as padded
    /// with empty cells.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    /// Renders the dataset as a human-readable console table.
    pub fn render(&self, style: TableStyle) -> String {
        let width = self.width();
        let mut widths = vec![0usize; width];
        if let Some(headers) = &self.headers {
            for (i, cell) in headers.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(width) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        match style {
            TableStyle::Plain | TableStyle::Simple => {
                let mut out = String::new();
                if let Some(headers) = &self.headers {
                    out.push_str(&format_row(headers, &widths));
                    out.push('\n');
                    if style == TableStyle::Simple {
                        let dashes: Vec<String> =
                            widths.iter().map(|w| "-".repeat(*w)).collect();
                        out.push_str(&dashes.join("  "));
                        out.push('\n');
                    }
                }
                for row in &self.rows {
                    out.push_str(&format_row(row, &widths));
                    out.push('\n');
                }
                out
            }
            TableStyle::Grid => {
                let border: String = widths
                    .iter()
                    .map(|w| format!("+{}", "-".repeat(w + 2)))
                    .collect::<String>()
                    + "+";
                let mut out = String::new();
                out.push_str(&border);
                out.push('\n');
                if let Some(headers) = &self.headers {
                    out.push_str(&format_grid_row(headers, &widths));
                    out.push('\n');
                    out.push_str(&border);
                    out.push('\n');
                }
                for row in &self.rows {
                    out.push_str(&format_grid_row(row, &widths));
                    out.push('\n');
                }
                out.push_str(&border);
                out.push('\n');
                out
            }
        }
    }
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| pad(cells.get(i).map_or("", String::as_str), *w))
        .collect();
    padded.join("  ").trim_end().to_string()
}

fn format_grid_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| pad(cells.get(i).map_or("", String::as_str), *w))
        .collect();
    format!("| {} |", padded.join(" | "))
}
