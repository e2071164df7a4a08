//! Coercion of loosely-typed raw input ahead of strict type checks.
//!
//! A coercion never fails on its own. It substitutes the default for absent or
//! empty input and normalizes what it can; anything it cannot normalize is
//! left in a shape the strict check rejects.

use crate::error::Violation;

/// Tokens accepted as `true` after lowercasing. Everything else is `false`.
/// `on` is deliberately absent.
pub const TRUTHY: [&str; 3] = ["true", "1", "yes"];

/// A configuration value between the raw environment and its typed field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Value {
    fn is_blank(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<Option<&str>> for Value {
    fn from(raw: Option<&str>) -> Self {
        raw.map_or(Value::Missing, |s| Value::Text(s.to_string()))
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::Text(raw.to_string())
    }
}

/// A preprocessing step, parameterized by the value substituted for absent input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coercion {
    Number(Option<f64>),
    Boolean(Option<bool>),
}

/// Numeric coercion with an optional default.
pub const fn to_number(default: Option<f64>) -> Coercion {
    Coercion::Number(default)
}

/// Boolean coercion with an optional default.
pub const fn to_boolean(default: Option<bool>) -> Coercion {
    Coercion::Boolean(default)
}

impl Coercion {
    pub fn apply(self, value: Value) -> Value {
        match self {
            Coercion::Number(default) => coerce_number(value, default),
            Coercion::Boolean(default) => coerce_boolean(value, default),
        }
    }
}

fn coerce_number(value: Value, default: Option<f64>) -> Value {
    if value.is_blank() {
        return default.map_or(Value::Missing, Value::Number);
    }
    match value {
        Value::Text(s) => Value::Number(parse_number(&s)),
        Value::Bool(b) => Value::Number(if b { 1.0 } else { 0.0 }),
        other => other,
    }
}

/// Unparseable text becomes NaN so the strict check reports a type mismatch
/// rather than the field silently becoming zero.
fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn coerce_boolean(value: Value, default: Option<bool>) -> Value {
    if value.is_blank() {
        return default.map_or(Value::Missing, Value::Bool);
    }
    match value {
        Value::Text(s) => Value::Bool(is_truthy(&s)),
        Value::Number(n) => Value::Bool(is_truthy(&n.to_string())),
        other => other,
    }
}

fn is_truthy(s: &str) -> bool {
    let lowered = s.to_lowercase();
    TRUTHY.contains(&lowered.as_str())
}

/// Strict numeric check: only finite numbers pass.
pub fn expect_number(value: &Value) -> Result<f64, Violation> {
    match value {
        Value::Number(n) if n.is_finite() => Ok(*n),
        Value::Missing => Err(Violation::Required),
        _ => Err(Violation::ExpectedNumber),
    }
}

/// Strict boolean check.
pub fn expect_bool(value: &Value) -> Result<bool, Violation> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Missing => Err(Violation::Required),
        _ => Err(Violation::ExpectedBoolean),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(raw: Option<&str>, default: Option<f64>) -> Result<f64, Violation> {
        expect_number(&to_number(default).apply(Value::from(raw)))
    }

    fn boolean(raw: Option<&str>, default: Option<bool>) -> Value {
        to_boolean(default).apply(Value::from(raw))
    }

    #[test]
    fn number_defaults_cover_absent_and_empty() {
        for default in [0.0, 8080.0, 0.7] {
            assert_eq!(num(None, Some(default)), Ok(default));
            assert_eq!(num(Some(""), Some(default)), Ok(default));
        }
    }

    #[test]
    fn number_without_default_stays_missing() {
        assert_eq!(to_number(None).apply(Value::Missing), Value::Missing);
        assert_eq!(num(Some(""), None), Err(Violation::Required));
    }

    #[test]
    fn number_parses_decimal_text() {
        assert_eq!(num(Some("5432"), Some(1.0)), Ok(5432.0));
        assert_eq!(num(Some(" 1.5 "), None), Ok(1.5));
        assert_eq!(num(Some("-3"), None), Ok(-3.0));
        assert_eq!(num(Some("1e3"), None), Ok(1000.0));
    }

    #[test]
    fn non_numeric_text_fails_type_check() {
        for raw in ["abc", "12abc", "0x10", "   ", "NaN", "inf"] {
            assert_eq!(
                num(Some(raw), Some(10.0)),
                Err(Violation::ExpectedNumber),
                "{raw:?} must not coerce to a number"
            );
        }
    }

    #[test]
    fn number_passes_native_values_through() {
        assert_eq!(to_number(None).apply(Value::Number(2.5)), Value::Number(2.5));
        assert_eq!(to_number(None).apply(Value::Bool(true)), Value::Number(1.0));
    }

    #[test]
    fn boolean_defaults_cover_absent_and_empty() {
        for default in [true, false] {
            assert_eq!(boolean(None, Some(default)), Value::Bool(default));
            assert_eq!(boolean(Some(""), Some(default)), Value::Bool(default));
        }
        assert_eq!(boolean(Some(""), None), Value::Missing);
    }

    #[test]
    fn boolean_truthy_tokens() {
        for raw in ["TRUE", "true", "True", "1", "yes", "YES"] {
            assert_eq!(boolean(Some(raw), None), Value::Bool(true), "{raw:?}");
        }
    }

    #[test]
    fn boolean_everything_else_is_false() {
        for raw in ["on", "ON", "off", "false", "0", "no", "y", "enabled", " true"] {
            assert_eq!(boolean(Some(raw), Some(true)), Value::Bool(false), "{raw:?}");
        }
    }

    #[test]
    fn boolean_handles_native_inputs() {
        assert_eq!(to_boolean(None).apply(Value::Bool(false)), Value::Bool(false));
        assert_eq!(to_boolean(None).apply(Value::Number(1.0)), Value::Bool(true));
        assert_eq!(to_boolean(None).apply(Value::Number(2.0)), Value::Bool(false));
    }

    #[test]
    fn strict_bool_rejects_missing() {
        assert_eq!(expect_bool(&Value::Missing), Err(Violation::Required));
        assert_eq!(expect_bool(&Value::Bool(true)), Ok(true));
    }
}
