//! Schema-driven record checks run before the rule list.

pub mod required;
pub mod types;
