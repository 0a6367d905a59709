//! Text helpers shared by scoring and token handling.

/// Normalizes text for comparison by lowercasing and replacing separators with spaces.
pub fn normalize_text(raw: &str) -> String {
    split_camel_case(raw.trim())
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized text with every non-alphanumeric character removed.
pub fn compact(raw: &str) -> String {
    normalize_text(raw)
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .collect()
}

/// Drops bracketed annotations such as `(kg)` or `[USD]`.
pub fn strip_annotations(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for ch in raw.chars() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Inserts a space at lower-to-upper transitions so `shipDate` reads as `ship Date`.
fn split_camel_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.chars() {
        if prev_lower && ch.is_uppercase() {
            out.push(' ');
        }
        out.push(ch);
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }
    out
}
