//! Header row detection for files with title or banner lines above the header.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    total: usize,
    non_empty: usize,
    alpha: usize,
    digit: usize,
}

impl RowStats {
    fn ratio(count: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    }

    fn non_empty_ratio(self) -> f64 {
        Self::ratio(self.non_empty, self.total)
    }

    fn alpha_ratio(self) -> f64 {
        Self::ratio(self.alpha, self.non_empty)
    }

    fn digit_ratio(self) -> f64 {
        Self::ratio(self.digit, self.non_empty)
    }
}

fn row_stats(row: &[String], width: usize) -> RowStats {
    let mut stats = RowStats {
        total: width,
        ..RowStats::default()
    };
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if trimmed.chars().any(|ch| ch.is_alphabetic()) {
            stats.alpha += 1;
        }
        if trimmed.chars().any(|ch| ch.is_ascii_digit()) {
            stats.digit += 1;
        }
    }
    stats
}

// Data rows carry dates, weights and references, so most cells have digits.
fn is_data_like(stats: RowStats) -> bool {
    stats.non_empty_ratio() >= 0.5 && stats.digit_ratio() >= 0.3
}

fn is_header_like(stats: RowStats) -> bool {
    stats.non_empty_ratio() >= 0.8 && stats.alpha_ratio() >= 0.5 && stats.digit_ratio() < 0.3
}

/// Most common row length, preferring the wider one on ties.
fn typical_width(rows: &[Vec<String>]) -> usize {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.len()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(len, count)| (count, len))
        .map_or(0, |(len, _)| len)
}

/// Index of the header among the first rows of a file.
///
/// Picks the first header-like row that appears before the data starts;
/// falls back to the first row. Rows are compared against the typical row
/// width so a one-cell title line never looks like a header.
pub fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let width = typical_width(rows);
    for (idx, row) in rows.iter().enumerate() {
        let stats = row_stats(row, width);
        if is_header_like(stats) {
            return idx;
        }
        if is_data_like(stats) {
            break;
        }
    }
    0
}

/// Trim, strip a byte-order mark and collapse inner whitespace.
pub(crate) fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header labels with trailing blanks dropped and inner blanks named by position.
pub(crate) fn header_labels(row: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = row.iter().map(|cell| normalize_label(cell)).collect();
    while labels.last().is_some_and(String::is_empty) {
        labels.pop();
    }
    for (idx, label) in labels.iter_mut().enumerate() {
        if label.is_empty() {
            *label = format!("Column {}", idx + 1);
        }
    }
    labels
}
