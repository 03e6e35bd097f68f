//! Core data types for domain availability checking.
//!
//! This module defines the unified result model every provider is normalized
//! into, the provider selector and credentials, batch requests, and the
//! configuration that drives adapters and the batch orchestrator.

use crate::error::DomainCheckError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Human-readable status labels. Every `CheckResult` carries one of these,
/// optionally followed by a price suffix for GoDaddy availability.
pub mod labels {
    pub const AVAILABLE: &str = "Available";
    pub const REGISTERED: &str = "Registered";
    pub const LIKELY_AVAILABLE: &str = "Likely Available";
    pub const PRIVACY_PROTECTED: &str = "Privacy-Protected (Registered)";
    pub const CHECK_FAILED: &str = "Check Failed";
    pub const UNKNOWN: &str = "Unknown";
    pub const RATE_LIMITED: &str = "Rate Limited";
    pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";
    pub const TIMEOUT: &str = "Timeout";
    pub const CONNECTION_FAILED: &str = "Connection Failed";
    pub const REQUEST_FAILED: &str = "Request Failed";
    pub const MALFORMED_RESPONSE: &str = "Malformed Response";
    pub const BAD_REQUEST: &str = "Bad Request";
    pub const API_ERROR: &str = "API Error";
}

/// Tri-state availability of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Free to register
    Available,
    /// Taken
    Registered,
    /// Transport failure, ambiguous answer, or throttled
    Unknown,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => write!(f, "AVAILABLE"),
            Availability::Registered => write!(f, "REGISTERED"),
            Availability::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Backend used to answer a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Registry lookup through the system WHOIS client
    Whois,
    /// Porkbun `checkDomain` REST endpoint
    Porkbun,
    /// GoDaddy `domains/available` REST endpoint
    #[serde(rename = "godaddy")]
    GoDaddy,
}

impl ProviderKind {
    /// Whether this provider needs an API key/secret pair.
    pub fn is_rest(&self) -> bool {
        !matches!(self, ProviderKind::Whois)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Whois => write!(f, "WHOIS"),
            ProviderKind::Porkbun => write!(f, "Porkbun"),
            ProviderKind::GoDaddy => write!(f, "GoDaddy"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = DomainCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whois" | "registry" => Ok(ProviderKind::Whois),
            "porkbun" => Ok(ProviderKind::Porkbun),
            "godaddy" => Ok(ProviderKind::GoDaddy),
            other => Err(DomainCheckError::config(format!(
                "Unknown provider '{}'. Use one of: whois, porkbun, godaddy",
                other
            ))),
        }
    }
}

/// API key/secret pair for one REST provider.
///
/// Passed by reference into each check and never stored by the engine.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub secret_key: String,
}

impl ProviderCredentials {
    pub fn new<K: Into<String>, S: Into<String>>(api_key: K, secret_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Both parts present and non-blank.
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &mask(&self.api_key))
            .field("secret_key", &"***")
            .finish()
    }
}

/// Keep the first four characters of a key for log correlation.
fn mask(value: &str) -> String {
    if value.chars().count() <= 4 {
        "***".to_string()
    } else {
        format!("{}***", value.chars().take(4).collect::<String>())
    }
}

/// One batch of domains to check against a single provider selection.
///
/// Entries are never deduplicated; each produces its own result.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub domains: Vec<String>,
    pub provider: ProviderKind,
    pub credentials: Option<ProviderCredentials>,
}

impl BatchRequest {
    pub fn new(domains: Vec<String>, provider: ProviderKind) -> Self {
        Self {
            domains,
            provider,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: ProviderCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Result of a domain availability check.
///
/// Fields are private so the cross-field invariants hold by construction:
/// available results never carry a registrar, registered results never carry
/// a price, and rate-limited results are always `Unknown` with a retry hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    domain: String,
    availability: Availability,
    status_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registrar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    renewal_price: Option<String>,
    provider: ProviderKind,
    rate_limited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
}

impl CheckResult {
    fn base(domain: &str, provider: ProviderKind, availability: Availability, label: &str) -> Self {
        Self {
            domain: domain.to_string(),
            availability,
            status_label: label.to_string(),
            registrar: None,
            creation_date: None,
            expiration_date: None,
            price: None,
            renewal_price: None,
            provider,
            rate_limited: false,
            retry_after_seconds: None,
            error_detail: None,
        }
    }

    /// Domain is free to register.
    pub fn available(domain: &str, provider: ProviderKind) -> Self {
        Self::base(domain, provider, Availability::Available, labels::AVAILABLE)
    }

    /// Domain is taken.
    pub fn registered(domain: &str, provider: ProviderKind) -> Self {
        Self::base(domain, provider, Availability::Registered, labels::REGISTERED)
    }

    /// Status could not be determined.
    pub fn unknown(domain: &str, provider: ProviderKind, label: &str) -> Self {
        Self::base(domain, provider, Availability::Unknown, label)
    }

    /// Provider throttled the request.
    pub fn rate_limited(domain: &str, provider: ProviderKind, retry_after_seconds: u64) -> Self {
        let mut result = Self::base(domain, provider, Availability::Unknown, labels::RATE_LIMITED);
        result.rate_limited = true;
        result.retry_after_seconds = Some(retry_after_seconds);
        result
    }

    /// Replace the status label, e.g. to append price text.
    pub fn with_label<L: Into<String>>(mut self, label: L) -> Self {
        self.status_label = label.into();
        self
    }

    /// Attach pricing. Ignored unless the domain is available.
    pub fn with_pricing(mut self, price: Option<String>, renewal_price: Option<String>) -> Self {
        if self.availability == Availability::Available {
            self.price = price.filter(|p| !p.trim().is_empty());
            self.renewal_price = renewal_price.filter(|p| !p.trim().is_empty());
        }
        self
    }

    /// Attach registration details. Ignored unless the domain is registered.
    pub fn with_registration(
        mut self,
        registrar: Option<String>,
        creation_date: Option<String>,
        expiration_date: Option<String>,
    ) -> Self {
        if self.availability == Availability::Registered {
            self.registrar = registrar.filter(|r| !r.trim().is_empty());
            self.creation_date = creation_date;
            self.expiration_date = expiration_date;
        }
        self
    }

    /// Attach an auxiliary diagnostic message.
    pub fn with_error_detail<D: Into<String>>(mut self, detail: D) -> Self {
        self.error_detail = Some(detail.into());
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn status_label(&self) -> &str {
        &self.status_label
    }

    pub fn registrar(&self) -> Option<&str> {
        self.registrar.as_deref()
    }

    pub fn creation_date(&self) -> Option<&str> {
        self.creation_date.as_deref()
    }

    pub fn expiration_date(&self) -> Option<&str> {
        self.expiration_date.as_deref()
    }

    pub fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }

    pub fn renewal_price(&self) -> Option<&str> {
        self.renewal_price.as_deref()
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited
    }

    pub fn retry_after_seconds(&self) -> Option<u64> {
        self.retry_after_seconds
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }
}

/// How a batch is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    /// One check at a time with a fixed delay between requests
    Sequential,
    /// Concurrent checks bounded by `CheckConfig::concurrency`
    Parallel,
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPolicy::Sequential => write!(f, "sequential"),
            ExecutionPolicy::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for ExecutionPolicy {
    type Err = DomainCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "throttled" => Ok(ExecutionPolicy::Sequential),
            "parallel" => Ok(ExecutionPolicy::Parallel),
            other => Err(DomainCheckError::config(format!(
                "Unknown policy '{}'. Use 'sequential' or 'parallel'",
                other
            ))),
        }
    }
}

pub const DEFAULT_PORKBUN_BASE_URL: &str = "https://api.porkbun.com/api/json/v3";
pub const DEFAULT_GODADDY_BASE_URL: &str = "https://api.ote-godaddy.com";

/// Configuration options for checks and batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Batch dispatch policy
    /// Default: sequential
    pub policy: ExecutionPolicy,

    /// Maximum in-flight checks under the parallel policy
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Pause between requests under the sequential policy
    /// Default: 100ms
    #[serde(skip)]
    pub request_delay: Duration,

    /// Porkbun request timeout
    /// Default: 10 seconds
    #[serde(skip)]
    pub porkbun_timeout: Duration,

    /// GoDaddy request timeout
    /// Default: 15 seconds
    #[serde(skip)]
    pub godaddy_timeout: Duration,

    /// Porkbun API root, without trailing slash
    pub porkbun_base_url: String,

    /// GoDaddy API root, without trailing slash
    pub godaddy_base_url: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            policy: ExecutionPolicy::Sequential,
            concurrency: 10,
            request_delay: Duration::from_millis(100),
            porkbun_timeout: Duration::from_secs(10),
            godaddy_timeout: Duration::from_secs(15),
            porkbun_base_url: DEFAULT_PORKBUN_BASE_URL.to_string(),
            godaddy_base_url: DEFAULT_GODADDY_BASE_URL.to_string(),
        }
    }
}

impl CheckConfig {
    /// Set the batch policy.
    pub fn with_policy(mut self, policy: ExecutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the worker cap, clamped to 1-100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the sequential inter-request delay.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_porkbun_base_url<U: Into<String>>(mut self, url: U) -> Self {
        self.porkbun_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_godaddy_base_url<U: Into<String>>(mut self, url: U) -> Self {
        self.godaddy_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_porkbun_timeout(mut self, timeout: Duration) -> Self {
        self.porkbun_timeout = timeout;
        self
    }

    pub fn with_godaddy_timeout(mut self, timeout: Duration) -> Self {
        self.godaddy_timeout = timeout;
        self
    }
}

/// Tally of a finished batch, used for summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub available: usize,
    pub registered: usize,
    pub unknown: usize,
    pub rate_limited: usize,
    /// Longest retry hint among rate-limited results
    pub max_retry_after_seconds: Option<u64>,
}

impl BatchSummary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let mut summary = BatchSummary {
            total: results.len(),
            ..Default::default()
        };

        for result in results {
            match result.availability() {
                Availability::Available => summary.available += 1,
                Availability::Registered => summary.registered += 1,
                Availability::Unknown => summary.unknown += 1,
            }
            if result.is_rate_limited() {
                summary.rate_limited += 1;
                summary.max_retry_after_seconds = summary
                    .max_retry_after_seconds
                    .max(result.retry_after_seconds());
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_dropped_on_registered() {
        let result = CheckResult::registered("taken.com", ProviderKind::Porkbun)
            .with_pricing(Some("10.00".into()), Some("12.00".into()));
        assert_eq!(result.price(), None);
        assert_eq!(result.renewal_price(), None);
    }

    #[test]
    fn test_registrar_dropped_on_available() {
        let result = CheckResult::available("free.com", ProviderKind::Whois).with_registration(
            Some("Example Registrar".into()),
            Some("2020-01-01".into()),
            None,
        );
        assert_eq!(result.registrar(), None);
        assert_eq!(result.creation_date(), None);
    }

    #[test]
    fn test_rate_limited_is_unknown_with_hint() {
        let result = CheckResult::rate_limited("busy.com", ProviderKind::Porkbun, 12);
        assert_eq!(result.availability(), Availability::Unknown);
        assert!(result.is_rate_limited());
        assert_eq!(result.retry_after_seconds(), Some(12));
        assert_eq!(result.status_label(), labels::RATE_LIMITED);
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("GoDaddy".parse::<ProviderKind>().unwrap(), ProviderKind::GoDaddy);
        assert_eq!(" porkbun ".parse::<ProviderKind>().unwrap(), ProviderKind::Porkbun);
        assert_eq!("registry".parse::<ProviderKind>().unwrap(), ProviderKind::Whois);
        assert!("namecheap".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = ProviderCredentials::new("pk1_abcdef", "sk1_topsecret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("pk1_***"));
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("abcdef"));
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(ProviderCredentials::new("k", "s").is_complete());
        assert!(!ProviderCredentials::new("k", "  ").is_complete());
        assert!(!ProviderCredentials::new("", "s").is_complete());
    }

    #[test]
    fn test_concurrency_clamped() {
        assert_eq!(CheckConfig::default().with_concurrency(0).concurrency, 1);
        assert_eq!(CheckConfig::default().with_concurrency(500).concurrency, 100);
    }

    #[test]
    fn test_result_serializes_without_empty_fields() {
        let result = CheckResult::available("free.com", ProviderKind::Porkbun)
            .with_pricing(Some("10.00".into()), None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["availability"], "available");
        assert_eq!(json["provider"], "porkbun");
        assert_eq!(json["price"], "10.00");
        assert!(json.get("registrar").is_none());
        assert!(json.get("renewal_price").is_none());
    }

    #[test]
    fn test_batch_summary_counts() {
        let results = vec![
            CheckResult::available("a.com", ProviderKind::Whois),
            CheckResult::registered("b.com", ProviderKind::Whois),
            CheckResult::rate_limited("c.com", ProviderKind::Porkbun, 12),
            CheckResult::rate_limited("d.com", ProviderKind::GoDaddy, 60),
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.registered, 1);
        assert_eq!(summary.unknown, 2);
        assert_eq!(summary.rate_limited, 2);
        assert_eq!(summary.max_retry_after_seconds, Some(60));
    }
}
