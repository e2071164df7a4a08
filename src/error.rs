//! Error types for env-schema.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("cannot read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The rule a single field broke.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    /// No value supplied and the field has no default.
    #[error("is required")]
    Required,
    /// String shorter than the rule's minimum length (in characters).
    #[error("must be at least {min} character(s)")]
    TooShort { min: usize },
    /// Value is not one of the enumerated choices.
    #[error("must be one of {}", .choices.join(", "))]
    NotOneOf { choices: &'static [&'static str] },
    /// Text rule received a non-text value.
    #[error("expected a string")]
    ExpectedString,
    /// Value did not coerce to a finite number.
    #[error("expected a number")]
    ExpectedNumber,
    /// Value did not coerce to a boolean.
    #[error("expected a boolean")]
    ExpectedBoolean,
    /// Number outside the rule's inclusive range.
    #[error("must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },
    /// Number is valid but does not fit the field's integer type.
    #[error("expected an integer between {min} and {max}")]
    NotInteger { min: u64, max: u64 },
}

/// One failing field from a validation pass.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} {violation}{}", render_raw(.raw))]
pub struct FieldError {
    pub field: &'static str,
    pub violation: Violation,
    /// The offending input. Secret fields carry a redaction marker instead.
    pub raw: Option<String>,
}

fn render_raw(raw: &Option<String>) -> String {
    raw.as_ref()
        .map(|r| format!(" (got {r:?})"))
        .unwrap_or_default()
}

/// Every field violation collected from one pass, in rule-table order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid configuration ({} error(s)){}", .errors.len(), render_list(.errors))]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

fn render_list(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("\n  - {e}")).collect()
}

impl ValidationFailure {
    /// Look up the error recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }
}
