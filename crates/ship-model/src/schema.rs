//! Canonical schema definitions.
//!
//! A schema is supplied by whoever instantiates the engine (usually loaded from a
//! profile file). It names the canonical fields, their semantic types, whether
//! they are required, and the header aliases the column mapper should accept.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Logical type a canonical field holds, independent of its source representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SemanticType {
    Date,
    Decimal,
    String,
    Enum {
        allowed: Vec<String>,
        /// Raw value -> allowed value, consulted before matching.
        #[serde(default)]
        synonyms: BTreeMap<String, String>,
    },
    Identifier {
        #[serde(default)]
        pattern: Option<String>,
    },
    /// A start/end date window such as a tanker laycan ("06-10 June", "2H July").
    DateRange,
}

impl SemanticType {
    pub fn enumeration<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SemanticType::Enum {
            allowed: allowed.into_iter().map(Into::into).collect(),
            synonyms: BTreeMap::new(),
        }
    }

    pub fn identifier(pattern: Option<&str>) -> Self {
        SemanticType::Identifier {
            pattern: pattern.map(str::to_string),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Date => "date",
            SemanticType::Decimal => "decimal",
            SemanticType::String => "string",
            SemanticType::Enum { .. } => "enum",
            SemanticType::Identifier { .. } => "identifier",
            SemanticType::DateRange => "date_range",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    #[serde(default)]
    pub required: bool,
    /// Header spellings accepted for this field, in addition to its name.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            required: false,
            aliases: Vec::new(),
            label: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name, aliases and label: every spelling the mapper compares headers against.
    pub fn match_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .chain(self.label.as_deref())
    }
}

/// Ordered list of canonical field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSchema {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl CanonicalSchema {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Case-insensitive field lookup.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| field.required)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(SchemaError::Empty {
                schema: self.name.clone(),
            });
        }
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            let key = field.name.trim().to_lowercase();
            if key.is_empty() {
                return Err(SchemaError::BlankFieldName {
                    schema: self.name.clone(),
                });
            }
            if !seen.insert(key) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if let SemanticType::Enum { allowed, .. } = &field.semantic_type
                && allowed.iter().all(|value| value.trim().is_empty())
            {
                return Err(SchemaError::EmptyEnum {
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_fields_are_rejected_case_insensitively() {
        let schema = CanonicalSchema::new(
            "dup",
            vec![
                FieldDef::new("weight", SemanticType::Decimal),
                FieldDef::new("Weight", SemanticType::Decimal),
            ],
        );
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateField {
                schema: "dup".to_string(),
                field: "Weight".to_string()
            })
        );
    }

    #[test]
    fn empty_enum_is_rejected() {
        let schema = CanonicalSchema::new(
            "s",
            vec![FieldDef::new("status", SemanticType::enumeration(Vec::<String>::new()))],
        );
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::EmptyEnum { .. })
        ));
    }

    #[test]
    fn match_names_include_aliases_and_label() {
        let field = FieldDef::new("weight", SemanticType::Decimal)
            .with_aliases(["wt"])
            .with_label("Gross weight");
        let names: Vec<&str> = field.match_names().collect();
        assert_eq!(names, vec!["weight", "wt", "Gross weight"]);
    }
}
