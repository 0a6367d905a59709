//! Enum value resolution against an allowed-value list.

use std::collections::BTreeMap;

use rapidfuzz::distance::levenshtein;

use crate::options::EnumMatching;
use crate::text::collapse_whitespace;

const MAX_SUGGESTIONS: usize = 3;

/// Creates a compact key by keeping only uppercase alphanumeric characters.
fn compact_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

fn loose_key(value: &str) -> String {
    collapse_whitespace(value).to_lowercase()
}

fn resolve_allowed<'a>(value: &str, allowed: &'a [String], matching: EnumMatching) -> Option<&'a str> {
    let key = loose_key(value);
    if let Some(found) = allowed.iter().find(|candidate| loose_key(candidate) == key) {
        return Some(found);
    }
    if matching == EnumMatching::Lenient {
        let compact = compact_key(value);
        if compact.is_empty() {
            return None;
        }
        return allowed
            .iter()
            .find(|candidate| compact_key(candidate) == compact)
            .map(String::as_str);
    }
    None
}

/// Resolve a raw value to its allowed spelling.
///
/// Synonyms are consulted first. On failure the error carries up to three
/// nearest allowed values within `max_distance` edits.
pub fn resolve_enum(
    raw: &str,
    allowed: &[String],
    synonyms: &BTreeMap<String, String>,
    matching: EnumMatching,
    max_distance: usize,
) -> Result<String, Vec<String>> {
    let trimmed = raw.trim();
    let synonym = synonyms.get(trimmed).or_else(|| {
        let key = loose_key(trimmed);
        synonyms
            .iter()
            .find(|(from, _)| loose_key(from) == key)
            .map(|(_, to)| to)
    });
    if let Some(target) = synonym
        && let Some(found) = resolve_allowed(target, allowed, matching)
    {
        return Ok(found.to_string());
    }
    if let Some(found) = resolve_allowed(trimmed, allowed, matching) {
        return Ok(found.to_string());
    }
    Err(suggest(trimmed, allowed, max_distance))
}

/// Allowed values ordered by edit distance, closest first.
pub fn suggest(raw: &str, allowed: &[String], max_distance: usize) -> Vec<String> {
    let needle = raw.to_lowercase();
    let mut scored: Vec<(usize, usize, &String)> = allowed
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let distance = levenshtein::distance(needle.chars(), candidate.to_lowercase().chars());
            (distance, idx, candidate)
        })
        .filter(|(distance, _, _)| *distance <= max_distance)
        .collect();
    scored.sort_by_key(|(distance, idx, _)| (*distance, *idx));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, _, candidate)| candidate.clone())
        .collect()
}
