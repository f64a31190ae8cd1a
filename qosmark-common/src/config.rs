use std::fmt;

use rustc_hash::FxHashMap;

use crate::{env, keys};

/// Read-only access to endpoint options.
///
/// Consumers look options up by key and decide themselves what a missing or malformed value means.
pub trait EndpointConfig {
    /// Returns the integer value stored under `key`, if any.
    fn get_int(&self, key: &str) -> Option<i32>;

    /// Returns the string value stored under `key`, if any.
    fn get_string(&self, key: &str) -> Option<&str>;
}

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// An integer option.
    Int(i32),
    /// A string option.
    String(String),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// An in-memory key/value option store.
///
/// Lookups are type-strict: a string stored under a key is never coerced into an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointArgs {
    args: FxHashMap<String, ArgValue>,
}

impl EndpointArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the options from the process environment.
    ///
    /// Only [`env::DSCP`] is recognized. Values that don't parse as an integer are skipped with a
    /// warning; range validation is left to the consumer.
    pub fn from_env() -> Self {
        let mut args = Self::new();

        if let Ok(raw) = std::env::var(env::DSCP) {
            match raw.trim().parse::<i32>() {
                Ok(dscp) => args.set_int(keys::DSCP, dscp),
                Err(e) => tracing::warn!(var = env::DSCP, value = %raw, "ignoring malformed value: {e}"),
            }
        }

        args
    }

    /// Sets an integer option, replacing any previous value.
    pub fn with_int(mut self, key: impl Into<String>, value: i32) -> Self {
        self.set_int(key, value);
        self
    }

    /// Sets a string option, replacing any previous value.
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), ArgValue::String(value.into()));
        self
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.args.insert(key.into(), ArgValue::Int(value));
    }

    pub fn remove(&mut self, key: &str) -> Option<ArgValue> {
        self.args.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.args.get(key)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl EndpointConfig for EndpointArgs {
    fn get_int(&self, key: &str) -> Option<i32> {
        match self.args.get(key)? {
            ArgValue::Int(v) => Some(*v),
            ArgValue::String(_) => None,
        }
    }

    fn get_string(&self, key: &str) -> Option<&str> {
        match self.args.get(key)? {
            ArgValue::String(s) => Some(s),
            ArgValue::Int(_) => None,
        }
    }
}
