//! A profile bundles a schema, its rules and the normalization and mapping
//! options that suit one kind of input.

use serde::{Deserialize, Serialize};
use ship_map::MappingOptions;
use ship_model::CanonicalSchema;
use ship_normalize::{Derivation, FieldNormalizer, NormalizeOptions};
use ship_validate::{RecordValidator, RuleSpec};

use crate::error::{ProfileError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: CanonicalSchema,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    /// `[[derive]]` entries, applied in file order.
    #[serde(default, rename = "derive", skip_serializing_if = "Vec::is_empty")]
    pub derivations: Vec<Derivation>,
    #[serde(default)]
    pub normalize: NormalizeOptions,
    #[serde(default)]
    pub mapping: MappingOptions,
}

impl Profile {
    /// Parse and check a profile. `origin` names it in error messages.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let profile: Profile = toml::from_str(text).map_err(|source| ProfileError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        profile.check(origin)?;
        Ok(profile)
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Schema validity, compilable identifier patterns, rule field references
    /// and derived field types.
    pub fn check(&self, origin: &str) -> Result<()> {
        self.schema
            .validate()
            .map_err(|source| ProfileError::InvalidSchema {
                origin: origin.to_string(),
                source,
            })?;
        FieldNormalizer::for_schema(&self.schema, self.normalize.clone()).map_err(|source| {
            ProfileError::InvalidPattern {
                origin: origin.to_string(),
                source,
            }
        })?;
        for spec in &self.rules {
            for field in spec.fields() {
                if self.schema.field(field).is_none() {
                    return Err(ProfileError::UnknownRuleField {
                        origin: origin.to_string(),
                        rule: spec.to_rule().name,
                        field: field.to_string(),
                    });
                }
            }
        }
        for derivation in &self.derivations {
            derivation
                .check(&self.schema)
                .map_err(|source| ProfileError::InvalidDerivation {
                    origin: origin.to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Validator running this profile's rules in file order.
    pub fn validator(&self) -> RecordValidator {
        RecordValidator::from_specs(&self.rules)
    }
}
