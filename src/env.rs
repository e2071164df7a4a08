//! Raw environment snapshot.
//!
//! Validation never reads the process environment directly; it works on a
//! `RawEnv` captured once, so the same snapshot always validates the same way.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// Key/value pairs as supplied by the host, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnv {
    vars: BTreeMap<String, String>,
}

impl RawEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    ///
    /// Entries whose key or value is not valid UTF-8 are skipped; no
    /// configuration key can match them anyway.
    pub fn from_std_env() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Read a dotenv file without touching the process environment.
    pub fn from_dotenv_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut vars = BTreeMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Ok(Self { vars })
    }

    /// Layer `self` over `base`: keys present here win.
    pub fn overlay(mut self, base: RawEnv) -> Self {
        for (key, value) in base.vars {
            self.vars.entry(key).or_insert(value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
