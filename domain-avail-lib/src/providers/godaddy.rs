//! GoDaddy adapter.
//!
//! One `GET {base}/v1/domains/available` per check with the `sso-key`
//! authorization header. HTTP status is classified before the body is read
//! as an availability answer.

use crate::classify::classify_http_status;
use crate::error::DomainCheckError;
use crate::providers::{build_http_client, require_credentials, ProviderAdapter, RawResponse};
use crate::types::{ProviderCredentials, ProviderKind, DEFAULT_GODADDY_BASE_URL};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use std::time::Duration;

/// Body of a successful availability check.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoDaddyAvailability {
    pub available: bool,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub definitive: Option<bool>,
    /// Price in micro-units of `currency`
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Registration period in years
    #[serde(default)]
    pub period: Option<u32>,
}

/// Error body GoDaddy sends alongside non-200 statuses.
#[derive(Debug, Deserialize)]
struct GoDaddyErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GoDaddyErrorBody {
    fn describe(self) -> Option<String> {
        match (self.code, self.message) {
            (Some(code), Some(message)) => Some(format!("{}: {}", code, message)),
            (None, Some(message)) => Some(message),
            (Some(code), None) => Some(code),
            (None, None) => None,
        }
    }
}

/// GoDaddy REST client.
#[derive(Debug, Clone)]
pub struct GoDaddyClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GoDaddyClient {
    /// Create a client against the OTE environment with the 15-second timeout.
    pub fn new() -> Result<Self, DomainCheckError> {
        Self::with_config(DEFAULT_GODADDY_BASE_URL, Duration::from_secs(15))
    }

    /// Create a client with a custom API root and timeout.
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self, DomainCheckError> {
        Ok(Self {
            http_client: build_http_client(ProviderKind::GoDaddy, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Availability endpoint (query string added per request).
    pub fn endpoint(&self) -> String {
        format!("{}/v1/domains/available", self.base_url)
    }

    /// Run one availability call.
    pub async fn check_domain(
        &self,
        domain: &str,
        credentials: &ProviderCredentials,
    ) -> Result<GoDaddyAvailability, DomainCheckError> {
        let provider = ProviderKind::GoDaddy;
        tracing::debug!(domain, url = %self.endpoint(), "godaddy request");

        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[
                ("domain", domain),
                ("checkType", "FAST"),
                ("forTransfer", "false"),
            ])
            .header(
                AUTHORIZATION,
                format!("sso-key {}:{}", credentials.api_key, credentials.secret_key),
            )
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DomainCheckError::from_reqwest(provider, self.timeout, &e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DomainCheckError::from_reqwest(provider, self.timeout, &e))?;
        tracing::debug!(domain, status, "godaddy response");

        if status != 200 {
            let message = serde_json::from_str::<GoDaddyErrorBody>(&body)
                .ok()
                .and_then(GoDaddyErrorBody::describe);
            if let Some(err) = classify_http_status(provider, status, message) {
                return Err(err);
            }
        }

        serde_json::from_str(&body).map_err(|e| {
            DomainCheckError::malformed(provider, format!("Failed to parse JSON: {}", e))
        })
    }
}

#[async_trait]
impl ProviderAdapter for GoDaddyClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoDaddy
    }

    async fn check(
        &self,
        domain: &str,
        credentials: Option<&ProviderCredentials>,
    ) -> Result<RawResponse, DomainCheckError> {
        let credentials = require_credentials(ProviderKind::GoDaddy, credentials)?;
        self.check_domain(domain, credentials)
            .await
            .map(RawResponse::GoDaddy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_available_payload() {
        let json = r#"{"available":true,"domain":"noteforget.dev","definitive":false,"price":11990000,"currency":"USD","period":1}"#;
        let parsed: GoDaddyAvailability = serde_json::from_str(json).unwrap();
        assert!(parsed.available);
        assert_eq!(parsed.price, Some(11_990_000));
        assert_eq!(parsed.period, Some(1));
    }

    #[test]
    fn test_missing_available_field_is_an_error() {
        assert!(serde_json::from_str::<GoDaddyAvailability>(r#"{"domain":"x.com"}"#).is_err());
    }

    #[test]
    fn test_error_body_description() {
        let body: GoDaddyErrorBody =
            serde_json::from_str(r#"{"code":"UNABLE_TO_AUTHENTICATE","message":"Unauthorized"}"#).unwrap();
        assert_eq!(body.describe().as_deref(), Some("UNABLE_TO_AUTHENTICATE: Unauthorized"));
    }
}
