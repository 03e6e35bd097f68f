//! Porkbun adapter.
//!
//! One authenticated `POST {base}/domain/checkDomain/{domain}` per check, with
//! the key pair in the JSON body. Transport faults, non-200 statuses and
//! non-JSON bodies become distinct errors; a 200 JSON payload is handed to
//! the normalizer as-is, limits block included.

use crate::classify::classify_porkbun;
use crate::error::DomainCheckError;
use crate::providers::{build_http_client, require_credentials, ProviderAdapter, RawResponse};
use crate::types::{ProviderCredentials, ProviderKind, DEFAULT_PORKBUN_BASE_URL};
use crate::utils::{flexible_string, flexible_u64};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level `checkDomain` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PorkbunCheckResponse {
    /// "SUCCESS" or "ERROR"
    #[serde(default)]
    pub status: Option<String>,
    /// Error text on failure
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Option<PorkbunAvailability>,
    #[serde(default)]
    pub limits: Option<PorkbunLimits>,
}

/// The `response` object of a successful check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PorkbunAvailability {
    /// "yes" / "no"
    #[serde(default, deserialize_with = "flexible_string")]
    pub avail: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub price: Option<String>,
    #[serde(default)]
    pub additional: Option<PorkbunAdditional>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PorkbunAdditional {
    #[serde(default)]
    pub renewal: Option<PorkbunPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PorkbunPrice {
    #[serde(default, deserialize_with = "flexible_string")]
    pub price: Option<String>,
}

/// Check quota block. Porkbun sends numbers as strings or integers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PorkbunLimits {
    #[serde(default, rename = "TTL", deserialize_with = "flexible_u64")]
    pub ttl: Option<u64>,
    #[serde(default, deserialize_with = "flexible_u64")]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "flexible_u64")]
    pub used: Option<u64>,
    #[serde(default, rename = "naturalLanguage")]
    pub natural_language: Option<String>,
}

impl PorkbunCheckResponse {
    /// Renewal price nested under `response.additional.renewal`.
    pub fn renewal_price(&self) -> Option<String> {
        self.response
            .as_ref()
            .and_then(|r| r.additional.as_ref())
            .and_then(|a| a.renewal.as_ref())
            .and_then(|r| r.price.clone())
    }
}

#[derive(Serialize)]
struct AuthBody<'a> {
    apikey: &'a str,
    secretapikey: &'a str,
}

/// Porkbun REST client.
#[derive(Debug, Clone)]
pub struct PorkbunClient {
    http_client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl PorkbunClient {
    /// Create a client against the public API with the 10-second timeout.
    pub fn new() -> Result<Self, DomainCheckError> {
        Self::with_config(DEFAULT_PORKBUN_BASE_URL, Duration::from_secs(10))
    }

    /// Create a client with a custom API root and timeout.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` is not an absolute
    /// http(s) URL.
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self, DomainCheckError> {
        let invalid = |reason: String| {
            DomainCheckError::config(format!("Invalid Porkbun base URL '{}': {}", base_url, reason))
        };
        let parsed = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }

        Ok(Self {
            http_client: build_http_client(ProviderKind::Porkbun, timeout)?,
            base_url: parsed,
            timeout,
        })
    }

    /// URL for one domain's check. The domain is a single, percent-encoded
    /// path segment.
    pub fn endpoint(&self, domain: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["domain", "checkDomain", domain]);
        }
        url
    }

    /// Run one `checkDomain` call.
    pub async fn check_domain(
        &self,
        domain: &str,
        credentials: &ProviderCredentials,
    ) -> Result<PorkbunCheckResponse, DomainCheckError> {
        let provider = ProviderKind::Porkbun;
        let url = self.endpoint(domain);
        tracing::debug!(domain, %url, "porkbun request");

        let response = self
            .http_client
            .post(url)
            .json(&AuthBody {
                apikey: &credentials.api_key,
                secretapikey: &credentials.secret_key,
            })
            .send()
            .await
            .map_err(|e| DomainCheckError::from_reqwest(provider, self.timeout, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainCheckError::from_reqwest(provider, self.timeout, &e))?;
        tracing::debug!(domain, status = status.as_u16(), "porkbun response");

        if status != StatusCode::OK {
            // Limit and key notices also arrive with error statuses.
            let parsed = serde_json::from_str::<PorkbunCheckResponse>(&body).ok();
            if let Some(err) = parsed.as_ref().and_then(classify_porkbun) {
                return Err(err);
            }
            if status == StatusCode::UNAUTHORIZED {
                let notice = parsed.and_then(|p| p.message);
                return Err(DomainCheckError::auth(
                    provider,
                    notice.unwrap_or_else(|| "HTTP 401 Unauthorized".to_string()),
                ));
            }
            return Err(DomainCheckError::HttpStatus {
                provider,
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            DomainCheckError::malformed(provider, format!("Failed to parse JSON: {}", e))
        })
    }
}

#[async_trait]
impl ProviderAdapter for PorkbunClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Porkbun
    }

    async fn check(
        &self,
        domain: &str,
        credentials: Option<&ProviderCredentials>,
    ) -> Result<RawResponse, DomainCheckError> {
        let credentials = require_credentials(ProviderKind::Porkbun, credentials)?;
        self.check_domain(domain, credentials)
            .await
            .map(RawResponse::Porkbun)
    }
}
