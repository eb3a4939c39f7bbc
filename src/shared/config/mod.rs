//! Configuration helpers shared by the server and client configuration.
//!
//! Both halves read their settings from environment variables; the parsing
//! rules live here so `COOKIE_SECURE=yes` means the same thing everywhere.

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Read a boolean flag; `None` when unset or unrecognized.
pub fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// Read and parse a value, falling back to `default` when unset.
///
/// A set-but-unparseable value is an error rather than a silent fallback.
pub fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

/// Check that a base URL is absolute http(s) and strip a trailing slash.
pub fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidUrl(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unique variable names per test avoid races between parallel tests.

    #[test]
    fn test_env_bool_variants() {
        for (i, (val, expected)) in [("1", true), ("YES", true), (" on ", true), ("off", false), ("0", false)]
            .iter()
            .enumerate()
        {
            let key = format!("__MURMUR_TEST_EB_{i}__");
            std::env::set_var(&key, val);
            assert_eq!(env_bool(&key), Some(*expected), "value {val:?}");
            std::env::remove_var(&key);
        }
    }

    #[test]
    fn test_env_bool_unrecognized_is_none() {
        let key = "__MURMUR_TEST_EB_MAYBE__";
        std::env::set_var(key, "maybe");
        assert_eq!(env_bool(key), None);
        std::env::remove_var(key);
        assert_eq!(env_bool("__MURMUR_TEST_EB_UNSET__"), None);
    }

    #[test]
    fn test_env_parse_default_and_error() {
        assert_eq!(env_parse("__MURMUR_TEST_EP_UNSET__", 42u32), Ok(42));

        std::env::set_var("__MURMUR_TEST_EP_BAD__", "ten");
        assert_eq!(
            env_parse("__MURMUR_TEST_EP_BAD__", 1u32),
            Err(ConfigError::InvalidValue {
                key: "__MURMUR_TEST_EP_BAD__",
                value: "ten".to_string()
            })
        );
        std::env::remove_var("__MURMUR_TEST_EP_BAD__");
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:5000/api/").unwrap(),
            "http://localhost:5000/api"
        );
        assert!(normalize_base_url("localhost:5000").is_err());
    }
}
