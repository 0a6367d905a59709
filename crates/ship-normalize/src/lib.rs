//! Field normalization for shipment records.
//!
//! This crate turns raw cells into typed canonical values:
//! - **date**: ISO, named-month and numeric layouts, spreadsheet serials
//! - **decimal**: locale separators, currency prefixes, unit suffixes
//! - **enumeration**: synonym and strict/lenient matching with suggestions
//! - **freight**: fixture freight quotes (`USD 12.5 pmt`, `2.15M Lumpsum`, `RNR`)
//! - **laycan**: shipping date windows such as `2H June`
//! - **normalizer**: the [`FieldNormalizer`] tying them together
//! - **derive**: fields computed from other fields, such as total freight

pub mod date;
pub mod decimal;
pub mod derive;
pub mod enumeration;
pub mod error;
pub mod freight;
pub mod laycan;
pub mod normalizer;
pub mod options;
pub mod text;

pub use date::{DateReading, excel_serial_to_date, parse_date_text};
pub use decimal::parse_decimal_text;
pub use derive::Derivation;
pub use enumeration::{resolve_enum, suggest};
pub use error::{NormalizeError, Result};
pub use freight::{FreightQuote, parse_freight};
pub use laycan::{Laycan, parse_laycan};
pub use normalizer::{FieldNormalizer, Normalized};
pub use options::{DateOrder, DecimalSeparator, EnumMatching, NormalizeOptions, UnitSuffix};
pub use text::{canonical_identifier, collapse_whitespace};
