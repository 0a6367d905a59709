//! Record-level validation for canonical shipment records.
//!
//! Validation runs three passes in order: required presence, declared type,
//! then the configured [`Rule`] list. Rules are data, so profiles can carry
//! them as [`RuleSpec`] entries.

pub mod checks;
pub mod rule;
pub mod spec;
pub mod validator;

pub use rule::Rule;
pub use spec::{RuleKind, RuleSpec};
pub use validator::RecordValidator;
