use thiserror::Error;

/// Problems found while checking a [`CanonicalSchema`](crate::CanonicalSchema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema '{schema}' defines no fields")]
    Empty { schema: String },
    #[error("schema '{schema}' has a field with a blank name")]
    BlankFieldName { schema: String },
    #[error("schema '{schema}' defines field '{field}' more than once")]
    DuplicateField { schema: String, field: String },
    #[error("enum field '{field}' has no allowed values")]
    EmptyEnum { field: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
