//! Formatter configuration. The only switch is whether `char*` values may be scanned for a
//! terminator; it is read once from a key-value source and then passed by value.

use std::env;

use thiserror::Error;
use tracing::warn;

/// Key consulted by [`DumpConfig::from_lookup`].
pub const UNSAFE_STRING_DUMP_KEY: &str = "unsafe-string-dump";
/// Environment variable backing the key in [`DumpConfig::from_env`].
pub const UNSAFE_STRING_DUMP_ENV: &str = "FFIDUMP_UNSAFE_STRING_DUMP";
/// Upper bound on bytes scanned behind a `char*`.
pub const MAX_STRING_LENGTH: usize = 255;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("'{value}' is not a valid value for '{key}', expected a boolean")]
    InvalidFlag { key: String, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpConfig {
    pub unsafe_string_dump: bool,
    pub max_string_length: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            unsafe_string_dump: false,
            max_string_length: MAX_STRING_LENGTH,
        }
    }
}

impl DumpConfig {
    pub fn unsafe_strings() -> Self {
        Self {
            unsafe_string_dump: true,
            ..Self::default()
        }
    }

    /// Builds a config from any key-value source. Missing keys keep their defaults; malformed
    /// values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(UNSAFE_STRING_DUMP_KEY) {
            match parse_flag(UNSAFE_STRING_DUMP_KEY, &raw) {
                Ok(enabled) => config.unsafe_string_dump = enabled,
                Err(err) => warn!(error = %err, "ignoring malformed dump setting"),
            }
        }
        config
    }

    /// Reads `FFIDUMP_UNSAFE_STRING_DUMP` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match key {
            UNSAFE_STRING_DUMP_KEY => env::var(UNSAFE_STRING_DUMP_ENV).ok(),
            _ => None,
        })
    }
}

/// Accepts `1/0`, `true/false`, `yes/no` and `on/off` in any case. An empty value is `false`.
pub fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::InvalidFlag {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
