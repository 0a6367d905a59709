//! Header tokenization and token-overlap adjustment.

use std::collections::BTreeSet;

use crate::utils::normalize_text;

const TOKEN_NO_OVERLAP_PENALTY: f64 = 0.6;
const TOKEN_GENERIC_ONLY_PENALTY: f64 = 0.55;
const TOKEN_SPECIFIC_BOOST: f64 = 1.05;

/// Canonical tokens of a header or field name.
pub fn token_set(raw: &str) -> BTreeSet<String> {
    let spaced = normalize_text(&raw.replace('#', " # "));
    let mut tokens = BTreeSet::new();
    for raw_token in spaced.split_whitespace() {
        for part in split_suffixes(raw_token) {
            if let Some(token) = normalize_token(part) {
                tokens.insert(token);
            }
        }
    }
    tokens
}

/// Sørensen-Dice coefficient over two token sets.
pub fn dice(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(right).count();
    (2 * shared) as f64 / (left.len() + right.len()) as f64
}

/// Scale a fuzzy score by how the token sets overlap.
pub fn overlap_adjustment(left: &BTreeSet<String>, right: &BTreeSet<String>, score: f64) -> f64 {
    let overlap: Vec<&String> = left.intersection(right).collect();
    if overlap.is_empty() {
        return score * TOKEN_NO_OVERLAP_PENALTY;
    }
    let specific = overlap.iter().any(|token| !is_generic_token(token));
    if !specific && overlap.len() <= 1 {
        return score * TOKEN_GENERIC_ONLY_PENALTY;
    }
    score * TOKEN_SPECIFIC_BOOST
}

fn split_suffixes(token: &str) -> Vec<&str> {
    const SUFFIXES: [&str; 6] = ["date", "dt", "id", "no", "num", "code"];
    for suffix in SUFFIXES {
        if token.len() > suffix.len() + 2 && token.ends_with(suffix) {
            let (base, tail) = token.split_at(token.len() - suffix.len());
            return vec![base, tail];
        }
    }
    vec![token]
}

fn normalize_token(token: &str) -> Option<String> {
    if token.is_empty() || token.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    if is_stopword(token) {
        return None;
    }
    let mapped = match token {
        "wt" | "wgt" | "weight" | "gross" | "gw" => "weight",
        "qty" | "quantity" | "amt" | "amount" => "quantity",
        "dt" | "date" | "day" => "date",
        "no" | "num" | "number" | "nbr" | "#" => "number",
        "id" | "ident" | "identifier" | "ref" | "reference" | "code" => "id",
        "orig" | "origin" | "from" | "pol" | "load" | "loading" => "origin",
        "dest" | "destination" | "to" | "pod" | "discharge" | "disport" => "destination",
        "awb" | "tracking" | "track" | "waybill" | "consignment" => "tracking",
        "stat" | "status" | "state" => "status",
        "ship" | "shipped" | "shipment" | "dispatch" | "dispatched" => "ship",
        "vsl" | "vessel" => "vessel",
        "chrtr" | "charterer" | "charterers" => "charterer",
        "frt" | "freight" => "freight",
        _ => token,
    };
    Some(mapped.to_string())
}

fn is_generic_token(token: &str) -> bool {
    matches!(token, "id" | "date" | "name" | "number" | "value" | "type")
}

fn is_stopword(token: &str) -> bool {
    matches!(
        token,
        "of" | "and" | "the" | "for" | "in" | "on" | "at" | "with" | "by" | "or" | "a" | "an"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|token| (*token).to_string()).collect()
    }

    #[test]
    fn canonicalizes_abbreviations() {
        assert_eq!(token_set("Wt"), set(&["weight"]));
        assert_eq!(token_set("Ship Dt"), set(&["ship", "date"]));
        assert_eq!(token_set("AWB #"), set(&["tracking", "number"]));
        assert_eq!(token_set("trackingId"), set(&["tracking", "id"]));
        assert_eq!(token_set("Qty of cargo"), set(&["quantity", "cargo"]));
    }

    #[test]
    fn splits_glued_suffixes() {
        assert_eq!(token_set("shipdate"), set(&["ship", "date"]));
        assert_eq!(token_set("invoiceno"), set(&["invoice", "number"]));
    }

    #[test]
    fn overlap_rules() {
        let a = set(&["ship", "date"]);
        let b = set(&["delivery", "date"]);
        let c = set(&["ship", "date"]);
        let d = set(&["weight"]);
        assert!((overlap_adjustment(&a, &b, 1.0) - 0.55).abs() < 1e-9);
        assert!((overlap_adjustment(&a, &c, 1.0) - 1.05).abs() < 1e-9);
        assert!((overlap_adjustment(&a, &d, 1.0) - 0.6).abs() < 1e-9);
        assert!((dice(&a, &b) - 0.5).abs() < 1e-9);
    }
}
