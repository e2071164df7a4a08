//! The configuration rule table and the per-field validation pipeline.
//!
//! Each field runs `raw -> coercion (optional) -> default -> strict check`.
//! Failures are collected per field; nothing short-circuits.

use std::str::FromStr;

use secrecy::SecretString;

use super::coerce::{Coercion, Value, expect_bool, expect_number, to_boolean, to_number};
use super::secrets::REDACTED;
use super::{LlmProvider, LogFormat, LogLevel, NodeEnv};
use crate::env::RawEnv;
use crate::error::{FieldError, ValidationFailure, Violation};

// ---------------------------------------------------------------------------
// Rule types
// ---------------------------------------------------------------------------

/// Functional area a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Application,
    Database,
    Cache,
    Auth,
    Security,
    Logging,
    Llm,
    Monitoring,
    Features,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Group::Application => "application",
            Group::Database => "database",
            Group::Cache => "cache",
            Group::Auth => "auth",
            Group::Security => "security",
            Group::Logging => "logging",
            Group::Llm => "llm",
            Group::Monitoring => "monitoring",
            Group::Features => "features",
        };
        write!(f, "{s}")
    }
}

/// Strict check applied after coercion and defaulting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    Text { min_len: usize },
    OneOf(&'static [&'static str]),
    Number { range: Option<(f64, f64)> },
    Boolean,
}

/// Value used when a field is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    Text(&'static str),
    Number(f64),
    Flag(bool),
}

impl From<Fallback> for Value {
    fn from(fallback: Fallback) -> Self {
        match fallback {
            Fallback::Text(s) => Value::Text(s.to_string()),
            Fallback::Number(n) => Value::Number(n),
            Fallback::Flag(b) => Value::Bool(b),
        }
    }
}

impl std::fmt::Display for Fallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fallback::Text(s) => write!(f, "{s:?}"),
            Fallback::Number(n) => write!(f, "{n}"),
            Fallback::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Validation rule for one configuration key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub key: &'static str,
    pub group: Group,
    pub coerce: Option<Coercion>,
    pub check: Check,
    pub default: Option<Fallback>,
    /// Absent is acceptable and yields no value.
    pub optional: bool,
    /// Raw input is never echoed in errors.
    pub secret: bool,
    pub help: &'static str,
}

impl FieldRule {
    const fn base(key: &'static str, group: Group, check: Check) -> Self {
        Self {
            key,
            group,
            coerce: None,
            check,
            default: None,
            optional: false,
            secret: false,
            help: "",
        }
    }

    /// Required, non-empty string.
    pub const fn required_text(key: &'static str, group: Group) -> Self {
        Self::base(key, group, Check::Text { min_len: 1 })
    }

    pub const fn text_or(key: &'static str, group: Group, default: &'static str) -> Self {
        Self {
            default: Some(Fallback::Text(default)),
            ..Self::base(key, group, Check::Text { min_len: 0 })
        }
    }

    pub const fn optional_text(key: &'static str, group: Group) -> Self {
        Self {
            optional: true,
            ..Self::base(key, group, Check::Text { min_len: 0 })
        }
    }

    pub const fn one_of(
        key: &'static str,
        group: Group,
        choices: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            default: Some(Fallback::Text(default)),
            ..Self::base(key, group, Check::OneOf(choices))
        }
    }

    pub const fn number(key: &'static str, group: Group, default: f64) -> Self {
        Self {
            coerce: Some(to_number(Some(default))),
            default: Some(Fallback::Number(default)),
            ..Self::base(key, group, Check::Number { range: None })
        }
    }

    pub const fn flag(key: &'static str, group: Group, default: bool) -> Self {
        Self {
            coerce: Some(to_boolean(Some(default))),
            default: Some(Fallback::Flag(default)),
            ..Self::base(key, group, Check::Boolean)
        }
    }

    pub const fn min_len(self, min_len: usize) -> Self {
        Self {
            check: Check::Text { min_len },
            ..self
        }
    }

    /// Inclusive bounds, checked after coercion. The default covers absence
    /// only; explicit out-of-range input still fails.
    pub const fn range(self, min: f64, max: f64) -> Self {
        Self {
            check: Check::Number {
                range: Some((min, max)),
            },
            ..self
        }
    }

    pub const fn secret(self) -> Self {
        Self {
            secret: true,
            ..self
        }
    }

    pub const fn help(self, help: &'static str) -> Self {
        Self { help, ..self }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.optional
    }

    /// Run the full pipeline for one raw input.
    ///
    /// `Ok(Value::Missing)` is only returned for optional fields.
    pub fn evaluate(&self, raw: Option<&str>) -> Result<Value, FieldError> {
        // Coerced fields take the default for empty input too; others only when absent.
        let defaulted = raw.is_none() || (self.coerce.is_some() && raw == Some(""));
        if let Some(fallback) = self.default.filter(|_| defaulted) {
            tracing::debug!(field = self.key, default = %fallback, "using default");
        }

        let mut value = Value::from(raw);
        if let Some(coercion) = self.coerce {
            value = coercion.apply(value);
        }

        if value == Value::Missing {
            match self.default {
                Some(fallback) => value = fallback.into(),
                None if self.optional => return Ok(Value::Missing),
                None => return Err(self.error(Violation::Required, raw)),
            }
        }

        self.check_value(&value).map_err(|v| self.error(v, raw))?;
        Ok(value)
    }

    fn check_value(&self, value: &Value) -> Result<(), Violation> {
        match self.check {
            Check::Text { min_len } => match value {
                Value::Text(s) if s.chars().count() >= min_len => Ok(()),
                Value::Text(_) => Err(Violation::TooShort { min: min_len }),
                _ => Err(Violation::ExpectedString),
            },
            Check::OneOf(choices) => match value {
                Value::Text(s) if choices.contains(&s.as_str()) => Ok(()),
                _ => Err(Violation::NotOneOf { choices }),
            },
            Check::Number { range } => {
                let n = expect_number(value)?;
                match range {
                    Some((min, max)) if n < min || n > max => {
                        Err(Violation::OutOfRange { min, max })
                    }
                    _ => Ok(()),
                }
            }
            Check::Boolean => expect_bool(value).map(|_| ()),
        }
    }

    fn error(&self, violation: Violation, raw: Option<&str>) -> FieldError {
        let raw = raw.map(|r| {
            if self.secret {
                REDACTED.to_string()
            } else {
                r.to_string()
            }
        });
        FieldError {
            field: self.key,
            violation,
            raw,
        }
    }

    /// Short type label for docs and the CLI.
    pub fn describe_type(&self) -> String {
        match self.check {
            Check::Text { min_len: 0 } => "string".to_string(),
            Check::Text { min_len } => format!("string (min {min_len})"),
            Check::OneOf(choices) => format!("enum {{{}}}", choices.join(",")),
            Check::Number { range: None } => "number".to_string(),
            Check::Number {
                range: Some((min, max)),
            } => format!("number [{min}, {max}]"),
            Check::Boolean => "boolean".to_string(),
        }
    }

    pub fn describe_default(&self) -> String {
        match self.default {
            Some(fallback) => fallback.to_string(),
            None if self.optional => "(unset)".to_string(),
            None => "(required)".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

use Group::*;

pub const NODE_ENV: FieldRule =
    FieldRule::one_of("NODE_ENV", Application, NodeEnv::CHOICES, "development")
        .help("Deployment environment");
pub const PORT: FieldRule =
    FieldRule::number("PORT", Application, 8080.0).help("HTTP listen port");
pub const API_PREFIX: FieldRule =
    FieldRule::text_or("API_PREFIX", Application, "api").help("Route prefix for the API");

pub const DB_HOST: FieldRule = FieldRule::required_text("DB_HOST", Database);
pub const DB_PORT: FieldRule = FieldRule::number("DB_PORT", Database, 5432.0);
pub const DB_USERNAME: FieldRule = FieldRule::required_text("DB_USERNAME", Database);
pub const DB_PASSWORD: FieldRule = FieldRule::required_text("DB_PASSWORD", Database).secret();
pub const DB_NAME: FieldRule = FieldRule::required_text("DB_NAME", Database);
pub const DB_SYNC: FieldRule =
    FieldRule::flag("DB_SYNC", Database, false).help("Auto-sync schema on boot");
pub const DB_LOGGING: FieldRule =
    FieldRule::flag("DB_LOGGING", Database, false).help("Log database queries");
pub const DB_SSL: FieldRule = FieldRule::flag("DB_SSL", Database, false);
pub const DB_POOL_MIN: FieldRule = FieldRule::number("DB_POOL_MIN", Database, 2.0);
pub const DB_POOL_MAX: FieldRule = FieldRule::number("DB_POOL_MAX", Database, 10.0);

pub const REDIS_HOST: FieldRule = FieldRule::required_text("REDIS_HOST", Cache);
pub const REDIS_PORT: FieldRule = FieldRule::number("REDIS_PORT", Cache, 6379.0);
pub const REDIS_PASSWORD: FieldRule = FieldRule::optional_text("REDIS_PASSWORD", Cache).secret();
pub const REDIS_DB: FieldRule =
    FieldRule::number("REDIS_DB", Cache, 0.0).help("Logical database index");
pub const REDIS_TTL: FieldRule =
    FieldRule::number("REDIS_TTL", Cache, 3600.0).help("Default cache TTL in seconds");

pub const JWT_SECRET: FieldRule = FieldRule::required_text("JWT_SECRET", Auth)
    .min_len(32)
    .secret()
    .help("Access token signing secret");
pub const JWT_EXPIRATION: FieldRule = FieldRule::text_or("JWT_EXPIRATION", Auth, "7d");
pub const JWT_REFRESH_SECRET: FieldRule = FieldRule::required_text("JWT_REFRESH_SECRET", Auth)
    .min_len(32)
    .secret()
    .help("Refresh token signing secret");
pub const JWT_REFRESH_EXPIRATION: FieldRule =
    FieldRule::text_or("JWT_REFRESH_EXPIRATION", Auth, "30d");

pub const BCRYPT_ROUNDS: FieldRule = FieldRule::number("BCRYPT_ROUNDS", Security, 10.0);
pub const RATE_LIMIT_TTL: FieldRule =
    FieldRule::number("RATE_LIMIT_TTL", Security, 60.0).help("Rate limit window in seconds");
pub const RATE_LIMIT_MAX: FieldRule =
    FieldRule::number("RATE_LIMIT_MAX", Security, 10.0).help("Requests allowed per window");
pub const CORS_ORIGIN: FieldRule =
    FieldRule::text_or("CORS_ORIGIN", Security, "http://localhost:3001");

pub const LOG_LEVEL: FieldRule = FieldRule::one_of("LOG_LEVEL", Logging, LogLevel::CHOICES, "info");
pub const LOG_FORMAT: FieldRule =
    FieldRule::one_of("LOG_FORMAT", Logging, LogFormat::CHOICES, "json");

pub const LLM_PROVIDER: FieldRule =
    FieldRule::one_of("LLM_PROVIDER", Llm, LlmProvider::CHOICES, "openai");
pub const OPENAI_API_KEY: FieldRule = FieldRule::optional_text("OPENAI_API_KEY", Llm).secret();
pub const ANTHROPIC_API_KEY: FieldRule =
    FieldRule::optional_text("ANTHROPIC_API_KEY", Llm).secret();
pub const LLM_MODEL: FieldRule = FieldRule::text_or("LLM_MODEL", Llm, "gpt-3.5-turbo");
pub const LLM_MAX_TOKENS: FieldRule = FieldRule::number("LLM_MAX_TOKENS", Llm, 1000.0);
pub const LLM_TEMPERATURE: FieldRule = FieldRule::number("LLM_TEMPERATURE", Llm, 0.7)
    .range(0.0, 2.0)
    .help("Sampling temperature");

pub const SENTRY_DSN: FieldRule = FieldRule::optional_text("SENTRY_DSN", Monitoring).secret();

pub const ENABLE_SWAGGER: FieldRule = FieldRule::flag("ENABLE_SWAGGER", Features, true);
pub const ENABLE_METRICS: FieldRule = FieldRule::flag("ENABLE_METRICS", Features, false);

/// Every recognized key, in reporting order.
pub const RULES: &[FieldRule] = &[
    NODE_ENV,
    PORT,
    API_PREFIX,
    DB_HOST,
    DB_PORT,
    DB_USERNAME,
    DB_PASSWORD,
    DB_NAME,
    DB_SYNC,
    DB_LOGGING,
    DB_SSL,
    DB_POOL_MIN,
    DB_POOL_MAX,
    REDIS_HOST,
    REDIS_PORT,
    REDIS_PASSWORD,
    REDIS_DB,
    REDIS_TTL,
    JWT_SECRET,
    JWT_EXPIRATION,
    JWT_REFRESH_SECRET,
    JWT_REFRESH_EXPIRATION,
    BCRYPT_ROUNDS,
    RATE_LIMIT_TTL,
    RATE_LIMIT_MAX,
    CORS_ORIGIN,
    LOG_LEVEL,
    LOG_FORMAT,
    LLM_PROVIDER,
    OPENAI_API_KEY,
    ANTHROPIC_API_KEY,
    LLM_MODEL,
    LLM_MAX_TOKENS,
    LLM_TEMPERATURE,
    SENTRY_DSN,
    ENABLE_SWAGGER,
    ENABLE_METRICS,
];

pub fn rule(key: &str) -> Option<&'static FieldRule> {
    RULES.iter().find(|r| r.key == key)
}

// ---------------------------------------------------------------------------
// Typed collection
// ---------------------------------------------------------------------------

/// Unsigned integer targets for numeric fields.
pub trait Integer: Sized {
    const MAX: u64;
    fn from_u64(n: u64) -> Self;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(impl Integer for $t {
            const MAX: u64 = <$t>::MAX as u64;
            fn from_u64(n: u64) -> Self {
                n as $t
            }
        })*
    };
}

impl_integer!(u16, u32, u64);

/// Runs rules against one snapshot and hands out typed values.
///
/// Every accessor returns `None` after recording a failure, so callers bind
/// every field first and assemble with `?` only at the end.
pub struct Collector<'a> {
    env: &'a RawEnv,
    errors: Vec<FieldError>,
}

impl<'a> Collector<'a> {
    pub fn new(env: &'a RawEnv) -> Self {
        Self {
            env,
            errors: Vec::new(),
        }
    }

    fn value(&mut self, rule: &FieldRule) -> Option<Value> {
        match rule.evaluate(self.env.get(rule.key)) {
            Ok(value) => Some(value),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }

    fn reject(&mut self, rule: &FieldRule, violation: Violation) {
        self.errors
            .push(rule.error(violation, self.env.get(rule.key)));
    }

    pub fn text(&mut self, rule: &FieldRule) -> Option<String> {
        match self.value(rule)? {
            Value::Text(s) => Some(s),
            _ => {
                self.reject(rule, Violation::ExpectedString);
                None
            }
        }
    }

    pub fn optional_text(&mut self, rule: &FieldRule) -> Option<Option<String>> {
        match self.value(rule)? {
            Value::Missing => Some(None),
            Value::Text(s) => Some(Some(s)),
            _ => {
                self.reject(rule, Violation::ExpectedString);
                None
            }
        }
    }

    pub fn secret(&mut self, rule: &FieldRule) -> Option<SecretString> {
        self.text(rule).map(SecretString::from)
    }

    pub fn optional_secret(&mut self, rule: &FieldRule) -> Option<Option<SecretString>> {
        self.optional_text(rule)
            .map(|opt| opt.map(SecretString::from))
    }

    pub fn choice<T: FromStr>(&mut self, rule: &FieldRule) -> Option<T> {
        let token = self.text(rule)?;
        match token.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                let choices = match rule.check {
                    Check::OneOf(choices) => choices,
                    _ => &[],
                };
                self.reject(rule, Violation::NotOneOf { choices });
                None
            }
        }
    }

    pub fn float(&mut self, rule: &FieldRule) -> Option<f64> {
        match self.value(rule)? {
            Value::Number(n) => Some(n),
            _ => {
                self.reject(rule, Violation::ExpectedNumber);
                None
            }
        }
    }

    /// Number that must also be a whole value within `T`'s range.
    pub fn integer<T: Integer>(&mut self, rule: &FieldRule) -> Option<T> {
        let n = self.float(rule)?;
        // `T::MAX as f64` rounds up for u64, so the bound is exclusive.
        if n.fract() == 0.0 && n >= 0.0 && n < T::MAX as f64 + 1.0 {
            Some(T::from_u64(n as u64))
        } else {
            self.reject(rule, Violation::NotInteger { min: 0, max: T::MAX });
            None
        }
    }

    pub fn flag(&mut self, rule: &FieldRule) -> Option<bool> {
        match self.value(rule)? {
            Value::Bool(b) => Some(b),
            _ => {
                self.reject(rule, Violation::ExpectedBoolean);
                None
            }
        }
    }

    /// Produce the assembled value, or every recorded failure.
    pub fn finish<T>(self, assembled: Option<T>) -> Result<T, ValidationFailure> {
        let mut errors = self.errors;
        match assembled {
            Some(value) if errors.is_empty() => Ok(value),
            _ => {
                errors.sort_by_key(|e| RULES.iter().position(|r| r.key == e.field));
                tracing::warn!(
                    errors = errors.len(),
                    fields = ?errors.iter().map(|e| e.field).collect::<Vec<_>>(),
                    "configuration validation failed"
                );
                Err(ValidationFailure { errors })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = RULES.iter().map(|r| r.key).collect();
        assert_eq!(keys.len(), RULES.len());
    }

    #[test]
    fn required_keys_match_table() {
        let required: Vec<_> = RULES
            .iter()
            .filter(|r| r.is_required())
            .map(|r| r.key)
            .collect();
        assert_eq!(
            required,
            [
                "DB_HOST",
                "DB_USERNAME",
                "DB_PASSWORD",
                "DB_NAME",
                "REDIS_HOST",
                "JWT_SECRET",
                "JWT_REFRESH_SECRET",
            ]
        );
    }

    #[test]
    fn temperature_default_covers_absence_only() {
        assert_eq!(LLM_TEMPERATURE.evaluate(None), Ok(Value::Number(0.7)));
        assert_eq!(LLM_TEMPERATURE.evaluate(Some("")), Ok(Value::Number(0.7)));
        assert_eq!(LLM_TEMPERATURE.evaluate(Some("2")), Ok(Value::Number(2.0)));

        let err = LLM_TEMPERATURE.evaluate(Some("3")).unwrap_err();
        assert_eq!(err.violation, Violation::OutOfRange { min: 0.0, max: 2.0 });
        assert_eq!(err.raw.as_deref(), Some("3"));

        let err = LLM_TEMPERATURE.evaluate(Some("-0.1")).unwrap_err();
        assert_eq!(err.violation, Violation::OutOfRange { min: 0.0, max: 2.0 });

        let err = LLM_TEMPERATURE.evaluate(Some("warm")).unwrap_err();
        assert_eq!(err.violation, Violation::ExpectedNumber);
    }

    #[test]
    fn text_default_does_not_cover_empty_string() {
        assert_eq!(API_PREFIX.evaluate(None), Ok(Value::Text("api".into())));
        assert_eq!(API_PREFIX.evaluate(Some("")), Ok(Value::Text(String::new())));
    }

    #[test]
    fn enum_rejects_empty_and_unknown() {
        assert_eq!(NODE_ENV.evaluate(None), Ok(Value::Text("development".into())));
        for raw in ["", "prod", "PRODUCTION"] {
            let err = NODE_ENV.evaluate(Some(raw)).unwrap_err();
            assert!(matches!(err.violation, Violation::NotOneOf { .. }), "{raw:?}");
        }
    }

    #[test]
    fn secret_length_is_checked_in_chars() {
        let err = JWT_SECRET.evaluate(Some("short")).unwrap_err();
        assert_eq!(err.violation, Violation::TooShort { min: 32 });
        assert!(JWT_SECRET.evaluate(Some("é".repeat(32).as_str())).is_ok());
    }

    #[test]
    fn secret_raw_values_are_redacted() {
        let err = JWT_SECRET.evaluate(Some("hunter2")).unwrap_err();
        assert_eq!(err.raw.as_deref(), Some(REDACTED));

        let err = DB_HOST.evaluate(Some("")).unwrap_err();
        assert_eq!(err.raw.as_deref(), Some(""));
    }

    #[test]
    fn optional_text_accepts_absent_and_empty() {
        assert_eq!(REDIS_PASSWORD.evaluate(None), Ok(Value::Missing));
        assert_eq!(REDIS_PASSWORD.evaluate(Some("")), Ok(Value::Text(String::new())));
    }

    #[test]
    fn integer_targets_reject_fractions_and_overflow() {
        let env: RawEnv = [("PORT", "80.5"), ("DB_PORT", "70000"), ("REDIS_DB", "-1")]
            .into_iter()
            .collect();
        let mut c = Collector::new(&env);
        assert_eq!(c.integer::<u16>(&PORT), None);
        assert_eq!(c.integer::<u16>(&DB_PORT), None);
        assert_eq!(c.integer::<u32>(&REDIS_DB), None);
        assert_eq!(c.integer::<u64>(&REDIS_TTL), Some(3600));

        let failure = c.finish(Some(())).unwrap_err();
        assert_eq!(
            failure.fields().collect::<Vec<_>>(),
            ["PORT", "DB_PORT", "REDIS_DB"]
        );
        assert_eq!(
            failure.get("DB_PORT").map(|e| &e.violation),
            Some(&Violation::NotInteger { min: 0, max: 65535 })
        );
    }

    #[test]
    fn u64_target_rejects_values_past_max() {
        for raw in ["18446744073709551616", "18446744073709552000"] {
            let env: RawEnv = [("REDIS_TTL", raw)].into_iter().collect();
            let mut c = Collector::new(&env);
            assert_eq!(c.integer::<u64>(&REDIS_TTL), None, "{raw}");

            let failure = c.finish(Some(())).unwrap_err();
            assert_eq!(
                failure.get("REDIS_TTL").map(|e| &e.violation),
                Some(&Violation::NotInteger { min: 0, max: u64::MAX })
            );
        }

        // Largest f64 below 2^64 still fits.
        let env: RawEnv = [("REDIS_TTL", "18446744073709549568")].into_iter().collect();
        let mut c = Collector::new(&env);
        assert_eq!(c.integer::<u64>(&REDIS_TTL), Some(18_446_744_073_709_549_568));
    }

    #[test]
    fn u16_target_accepts_max_and_rejects_one_past() {
        let env: RawEnv = [("PORT", "65535"), ("DB_PORT", "65536")].into_iter().collect();
        let mut c = Collector::new(&env);
        assert_eq!(c.integer::<u16>(&PORT), Some(65535));
        assert_eq!(c.integer::<u16>(&DB_PORT), None);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn defaults_are_logged_for_every_rule_kind() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            PORT.evaluate(None).unwrap();
            ENABLE_SWAGGER.evaluate(Some("")).unwrap();
            API_PREFIX.evaluate(None).unwrap();
            DB_PORT.evaluate(Some("6000")).unwrap();
            CORS_ORIGIN.evaluate(Some("")).unwrap();
        });

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out.matches("using default").count(), 3, "{out}");
        assert!(out.contains("PORT"), "{out}");
        assert!(out.contains("ENABLE_SWAGGER"), "{out}");
        assert!(out.contains("API_PREFIX"), "{out}");
        assert!(!out.contains("DB_PORT"), "{out}");
        assert!(!out.contains("CORS_ORIGIN"), "{out}");
    }

    #[test]
    fn describe_renders_rule() {
        assert_eq!(LLM_TEMPERATURE.describe_type(), "number [0, 2]");
        assert_eq!(LLM_TEMPERATURE.describe_default(), "0.7");
        assert_eq!(JWT_SECRET.describe_type(), "string (min 32)");
        assert_eq!(JWT_SECRET.describe_default(), "(required)");
        assert_eq!(SENTRY_DSN.describe_default(), "(unset)");
        assert_eq!(LOG_FORMAT.describe_type(), "enum {json,pretty}");
        assert_eq!(API_PREFIX.describe_default(), "\"api\"");
    }
}
