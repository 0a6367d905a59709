//! Named record rules.

use std::fmt;
use std::sync::Arc;

use ship_model::{CanonicalRecord, Severity};

type Predicate = Arc<dyn Fn(&CanonicalRecord) -> bool + Send + Sync>;

/// A named predicate over a canonical record.
///
/// The predicate returns `true` when the record passes. Rules are plain data,
/// so a validator is just an ordered list of them.
#[derive(Clone)]
pub struct Rule {
    pub name: String,
    pub message: String,
    pub severity: Severity,
    /// Field the violation is attributed to, if any.
    pub field: Option<String>,
    predicate: Predicate,
}

impl Rule {
    pub fn new<F>(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&CanonicalRecord) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            message: message.into(),
            severity: Severity::Error,
            field: None,
            predicate: Arc::new(predicate),
        }
    }

    /// Arbitrary caller-supplied check.
    pub fn custom<F>(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&CanonicalRecord) -> bool + Send + Sync + 'static,
    {
        Self::new(name, message, predicate)
    }

    /// `earlier` must not fall after `later`. Skipped when either is missing.
    pub fn date_order(earlier: &str, later: &str) -> Self {
        let (first, second) = (earlier.to_string(), later.to_string());
        Self::new(
            format!("{earlier}_before_{later}"),
            format!("{earlier} must not be after {later}"),
            move |record| {
                match (
                    record.value(&first).as_date(),
                    record.value(&second).as_date(),
                ) {
                    (Some(start), Some(end)) => start <= end,
                    _ => true,
                }
            },
        )
        .for_field(later)
    }

    /// A populated decimal must be strictly greater than zero.
    pub fn positive(field: &str) -> Self {
        let name = field.to_string();
        Self::new(
            format!("{field}_positive"),
            format!("{field} must be greater than zero"),
            move |record| record.value(&name).as_decimal().is_none_or(|value| value > 0.0),
        )
        .for_field(field)
    }

    /// A populated decimal must lie within the inclusive bounds given.
    pub fn range(field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        let name = field.to_string();
        let bounds = match (min, max) {
            (Some(min), Some(max)) => format!("between {min} and {max}"),
            (Some(min), None) => format!("at least {min}"),
            (None, Some(max)) => format!("at most {max}"),
            (None, None) => "any value".to_string(),
        };
        Self::new(
            format!("{field}_range"),
            format!("{field} must be {bounds}"),
            move |record| {
                record.value(&name).as_decimal().is_none_or(|value| {
                    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
                })
            },
        )
        .for_field(field)
    }

    /// Two populated fields must differ, ignoring case.
    pub fn not_equal(first: &str, second: &str) -> Self {
        let (a, b) = (first.to_string(), second.to_string());
        Self::new(
            format!("{first}_differs_from_{second}"),
            format!("{first} and {second} must differ"),
            move |record| {
                let (left, right) = (record.value(&a), record.value(&b));
                if left.is_missing() || right.is_missing() {
                    return true;
                }
                !left.render().eq_ignore_ascii_case(&right.render())
            },
        )
        .for_field(second)
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn check(&self, record: &CanonicalRecord) -> bool {
        (self.predicate)(record)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("severity", &self.severity)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}
