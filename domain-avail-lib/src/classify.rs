//! Rate-limit, credential and registry-failure classification.
//!
//! All string heuristics the engine relies on live here. REST payloads are
//! inspected for throttling before anything reads their availability fields,
//! so a limits block wins over a SUCCESS status.

use crate::error::DomainCheckError;
use crate::providers::{PorkbunCheckResponse, PorkbunLimits};
use crate::types::{labels, ProviderKind};
use regex::Regex;

/// Wait applied when a provider signals throttling without a usable window.
pub const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 12;

/// Fixed wait for GoDaddy HTTP 429 responses.
pub const GODADDY_RETRY_AFTER_SECS: u64 = 60;

lazy_static::lazy_static! {
    // "1 out of 1 checks within 10 seconds used."
    static ref CHECKS_USED_RE: Regex =
        Regex::new(r"(?i)(\d+)\s+checks?\s+within\s+(\S+)\s+seconds?\s+used")
            .expect("valid rate limit pattern");
}

/// Extract the wait from a "N checks within S seconds used" message.
///
/// Returns `None` when the message is not a limit notice. A notice whose
/// window does not parse falls back to the default wait.
pub fn rate_limit_wait_from_message(message: &str) -> Option<u64> {
    let caps = CHECKS_USED_RE.captures(message)?;
    Some(
        caps.get(2)
            .and_then(|window| window.as_str().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_WAIT_SECS),
    )
}

/// Wait implied by an exhausted limits block, or `None` if quota remains.
pub fn classify_limits(limits: &PorkbunLimits) -> Option<u64> {
    match (limits.used, limits.limit) {
        (Some(used), Some(limit)) if used >= limit => Some(
            limits
                .ttl
                .or_else(|| {
                    limits
                        .natural_language
                        .as_deref()
                        .and_then(rate_limit_wait_from_message)
                })
                .unwrap_or(DEFAULT_RATE_LIMIT_WAIT_SECS),
        ),
        _ => None,
    }
}

/// Whether a provider message reports rejected credentials.
pub fn is_auth_failure_message(message: &str) -> bool {
    message.to_lowercase().contains("invalid api key")
}

/// Find throttling or credential problems in a Porkbun payload.
///
/// Checked in order: structured limits, limit message, auth message.
pub fn classify_porkbun(response: &PorkbunCheckResponse) -> Option<DomainCheckError> {
    let provider = ProviderKind::Porkbun;

    if let Some(limits) = &response.limits {
        if let Some(wait) = classify_limits(limits) {
            let notice = limits
                .natural_language
                .clone()
                .or_else(|| response.message.clone());
            return Some(DomainCheckError::rate_limited(provider, wait, notice));
        }
    }

    let message = response.message.as_deref()?;
    if let Some(wait) = rate_limit_wait_from_message(message) {
        return Some(DomainCheckError::rate_limited(
            provider,
            wait,
            Some(message.to_string()),
        ));
    }

    if is_auth_failure_message(message) {
        return Some(DomainCheckError::auth(provider, message));
    }

    None
}

/// Classify a non-200 HTTP status from a REST provider.
///
/// Returns `None` for 200.
pub fn classify_http_status(
    provider: ProviderKind,
    status: u16,
    message: Option<String>,
) -> Option<DomainCheckError> {
    match status {
        200 => None,
        401 => Some(DomainCheckError::auth(
            provider,
            message.unwrap_or_else(|| "HTTP 401 Unauthorized".to_string()),
        )),
        429 => Some(DomainCheckError::rate_limited(
            provider,
            GODADDY_RETRY_AFTER_SECS,
            message,
        )),
        400 => Some(DomainCheckError::BadRequest {
            provider,
            message: message.unwrap_or_else(|| "HTTP 400 Bad Request".to_string()),
        }),
        other => Some(DomainCheckError::HttpStatus {
            provider,
            status: other,
        }),
    }
}

/// Reading of a failed WHOIS lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFailure {
    /// The registry said nothing matches
    LikelyAvailable,
    /// Record hidden behind privacy or redaction
    PrivacyProtected,
    CheckFailed,
}

impl RegistryFailure {
    pub fn label(&self) -> &'static str {
        match self {
            RegistryFailure::LikelyAvailable => labels::LIKELY_AVAILABLE,
            RegistryFailure::PrivacyProtected => labels::PRIVACY_PROTECTED,
            RegistryFailure::CheckFailed => labels::CHECK_FAILED,
        }
    }
}

/// Classify a WHOIS failure message, case-insensitively.
///
/// "No match" markers win over privacy markers.
pub fn classify_registry_failure(message: &str) -> RegistryFailure {
    let lower = message.to_lowercase();

    if lower.contains("no match") || lower.contains("not found") {
        RegistryFailure::LikelyAvailable
    } else if ["privacy", "protected", "redacted"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        RegistryFailure::PrivacyProtected
    } else {
        RegistryFailure::CheckFailed
    }
}
