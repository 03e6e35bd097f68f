//! Utility functions for domain validation, provider payload decoding and
//! small formatting helpers shared across the library.

use crate::error::DomainCheckError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

/// Validate a domain name format.
///
/// Only basic syntax is checked; the engine itself accepts any non-blank
/// string and lets the provider decide.
pub fn validate_domain(domain: &str) -> Result<(), DomainCheckError> {
    let trimmed = domain.trim();

    if trimmed.is_empty() {
        return Err(DomainCheckError::invalid_domain(
            domain,
            "Domain name cannot be empty",
        ));
    }

    if trimmed.contains(char::is_whitespace) {
        return Err(DomainCheckError::invalid_domain(
            domain,
            "Domain name cannot contain whitespace",
        ));
    }

    if trimmed.contains('.') {
        if !is_valid_fqdn(trimmed) {
            return Err(DomainCheckError::invalid_domain(
                domain,
                "Not a valid fully qualified domain name",
            ));
        }
    } else if !is_valid_base_name(trimmed) {
        return Err(DomainCheckError::invalid_domain(
            domain,
            "Base name must be at least 2 characters of letters, digits or hyphens",
        ));
    }

    Ok(())
}

/// Validate that a base domain name (without extension) is acceptable.
pub(crate) fn is_valid_base_name(name: &str) -> bool {
    if name.len() < 2 || name.starts_with('-') || name.ends_with('-') {
        return false;
    }

    name.chars().all(|c| c.is_alphanumeric() || c == '-')
}

/// Validate that an FQDN has basic valid structure.
pub(crate) fn is_valid_fqdn(domain: &str) -> bool {
    if domain.len() < 4 || domain.len() > 253 {
        return false;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    parts.iter().all(|part| {
        !part.is_empty()
            && part.len() <= 63
            && !part.starts_with('-')
            && !part.ends_with('-')
            && part.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}

/// Deserialize a field that providers send as either a string or a number.
pub(crate) fn flexible_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Deserialize a counter that may arrive as `1`, `"1"` or `1.0`.
pub(crate) fn flexible_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

/// Parse a timeout string like "5s", "30s", "2m" into a duration.
///
/// A bare number is read as seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(ms) = timeout_str.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(s) = timeout_str.strip_suffix('s') {
        s.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(m) = timeout_str.strip_suffix('m') {
        m.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        timeout_str.parse::<u64>().ok().map(Duration::from_secs)
    }
}

/// Render a micro-unit amount (1/1,000,000 of the currency) with two decimals.
pub fn format_micros_price(micros: u64) -> String {
    let cents = micros.saturating_add(5_000) / 10_000;
    format!("{}.{:02}", cents / 100, cents % 100)
}
