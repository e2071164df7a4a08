//! Secret handling utilities.
//!
//! Re-exports secrecy types and provides helpers for keeping secret values
//! out of logs, errors, and summaries.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Stand-in printed wherever a secret value would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// JSON placeholder for an optional secret: the marker when set, `null` when not.
pub fn masked(secret: Option<&SecretString>) -> serde_json::Value {
    match secret {
        Some(_) => serde_json::Value::from(REDACTED),
        None => serde_json::Value::Null,
    }
}
