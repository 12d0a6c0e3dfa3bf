//! Identifier filters applied before any name reaches a command line.

use once_cell::sync::Lazy;
use regex::Regex;

static SERVICE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("service id pattern is valid"));

static CONFIG_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("config key pattern is valid"));

/// Returns true if `name` is a well-formed service identifier.
pub fn is_service_id(name: &str) -> bool {
    SERVICE_ID.is_match(name)
}

/// Returns true if `key` is a well-formed configuration key.
pub fn is_config_key(key: &str) -> bool {
    CONFIG_KEY.is_match(key)
}

/// Splits `names` into accepted service identifiers and rejected entries,
/// keeping the input order and dropping duplicates from the accepted side.
pub fn filter_service_ids<S: AsRef<str>>(names: &[S]) -> (Vec<String>, Vec<String>) {
    let mut accepted: Vec<String> = Vec::with_capacity(names.len());
    let mut rejected = Vec::new();

    for name in names {
        let name = name.as_ref();
        if !is_service_id(name) {
            rejected.push(name.to_string());
        } else if !accepted.iter().any(|n| n == name) {
            accepted.push(name.to_string());
        }
    }

    (accepted, rejected)
}
