use ship_model::{CellValue, format_number};

/// Trim and collapse inner runs of whitespace to a single space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Identifier canonical form: whitespace removed, upper-cased.
pub fn canonical_identifier(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(text) => text
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect(),
        CellValue::Number(value) => format_number(*value),
        CellValue::Date(date) => date.format("%Y%m%d").to_string(),
        CellValue::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_inner_whitespace() {
        assert_eq!(collapse_whitespace("  Port \t of   Rotterdam "), "Port of Rotterdam");
    }

    #[test]
    fn identifiers_are_compacted() {
        assert_eq!(canonical_identifier(&CellValue::text(" ab 123 cd ")), "AB123CD");
        assert_eq!(canonical_identifier(&CellValue::Number(12345.0)), "12345");
    }
}
