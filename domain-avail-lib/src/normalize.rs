//! Response normalization.
//!
//! Maps each provider's raw answer, or the error its adapter returned, onto
//! the unified [`CheckResult`]. Every error becomes an `Unknown` result here,
//! which is what keeps failures from escaping a check.

use crate::classify::{classify_porkbun, classify_registry_failure};
use crate::error::DomainCheckError;
use crate::providers::{GoDaddyAvailability, PorkbunCheckResponse, RawResponse, WhoisRecord};
use crate::types::{labels, CheckResult, ProviderKind};
use crate::utils::format_micros_price;

/// Turn one adapter outcome into a result.
pub fn normalize(
    domain: &str,
    provider: ProviderKind,
    outcome: Result<RawResponse, DomainCheckError>,
) -> CheckResult {
    match outcome {
        Ok(RawResponse::Whois(record)) => normalize_whois(domain, &record),
        Ok(RawResponse::Porkbun(response)) => normalize_porkbun(domain, &response),
        Ok(RawResponse::GoDaddy(availability)) => normalize_godaddy(domain, &availability),
        Err(err) => normalize_error(domain, provider, &err),
    }
}

/// Map an adapter error onto an `Unknown` result with a diagnostic.
pub fn normalize_error(domain: &str, provider: ProviderKind, err: &DomainCheckError) -> CheckResult {
    let label = match err {
        DomainCheckError::RateLimited {
            retry_after_seconds,
            ..
        } => {
            return CheckResult::rate_limited(domain, provider, *retry_after_seconds)
                .with_error_detail(err.to_string());
        }
        DomainCheckError::RegistryLookup { message } => {
            classify_registry_failure(message).label()
        }
        DomainCheckError::WhoisUnavailable { .. } => labels::CHECK_FAILED,
        DomainCheckError::AuthenticationFailure { .. } => labels::INVALID_CREDENTIALS,
        DomainCheckError::Timeout { .. } => labels::TIMEOUT,
        DomainCheckError::ConnectionFailed { .. } => labels::CONNECTION_FAILED,
        DomainCheckError::Transport { .. } | DomainCheckError::HttpStatus { .. } => {
            labels::REQUEST_FAILED
        }
        DomainCheckError::MalformedResponse { .. } => labels::MALFORMED_RESPONSE,
        DomainCheckError::BadRequest { .. } => labels::BAD_REQUEST,
        DomainCheckError::ProviderError { .. } => labels::API_ERROR,
        DomainCheckError::InvalidDomain { .. }
        | DomainCheckError::ConfigError { .. }
        | DomainCheckError::FileError { .. } => labels::UNKNOWN,
    };

    CheckResult::unknown(domain, provider, label).with_error_detail(err.to_string())
}

/// A populated domain name means something is registered.
pub fn normalize_whois(domain: &str, record: &WhoisRecord) -> CheckResult {
    match &record.domain_name {
        Some(_) => CheckResult::registered(domain, ProviderKind::Whois).with_registration(
            record.registrar.clone(),
            record.creation_date.clone(),
            record.expiration_date.clone(),
        ),
        None => CheckResult::available(domain, ProviderKind::Whois),
    }
}

/// Classify throttling first, then read `status` and `avail`.
pub fn normalize_porkbun(domain: &str, response: &PorkbunCheckResponse) -> CheckResult {
    let provider = ProviderKind::Porkbun;

    if let Some(err) = classify_porkbun(response) {
        return normalize_error(domain, provider, &err);
    }

    if response
        .status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("ERROR"))
    {
        let err = DomainCheckError::ProviderError {
            provider,
            message: response
                .message
                .clone()
                .unwrap_or_else(|| "no message".to_string()),
        };
        return normalize_error(domain, provider, &err);
    }

    let Some(availability) = &response.response else {
        return normalize_error(
            domain,
            provider,
            &DomainCheckError::malformed(provider, "missing 'response' object"),
        );
    };

    let price = availability.price.clone().filter(|p| !p.trim().is_empty());
    let avail = availability
        .avail
        .as_deref()
        .map(|a| a.trim().to_lowercase());

    match avail.as_deref() {
        Some("yes") => CheckResult::available(domain, provider)
            .with_pricing(price, response.renewal_price()),
        Some("no") => CheckResult::registered(domain, provider),
        _ if price.is_some() => CheckResult::available(domain, provider)
            .with_pricing(price, response.renewal_price()),
        _ => CheckResult::unknown(domain, provider, labels::UNKNOWN),
    }
}

/// `available` maps 1:1; a price enriches the label.
pub fn normalize_godaddy(domain: &str, availability: &GoDaddyAvailability) -> CheckResult {
    let provider = ProviderKind::GoDaddy;

    if !availability.available {
        return CheckResult::registered(domain, provider);
    }

    let result = CheckResult::available(domain, provider);
    match availability.price {
        Some(micros) => {
            let price = format_micros_price(micros);
            let label = format!(
                "{} ({} {}/{}y)",
                labels::AVAILABLE,
                price,
                availability.currency.as_deref().unwrap_or("USD"),
                availability.period.unwrap_or(1)
            );
            result.with_label(label).with_pricing(Some(price), None)
        }
        None => result,
    }
}
