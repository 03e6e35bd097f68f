//! Provider adapters for domain checking.
//!
//! Each backend implements [`ProviderAdapter`], turning a domain name (plus
//! credentials for the REST providers) into a provider-specific
//! [`RawResponse`] or a [`DomainCheckError`]. Nothing here decides
//! availability; that is the normalizer's job.

/// Registry lookup through the system WHOIS client
pub mod whois;

/// Porkbun `checkDomain` REST adapter
pub mod porkbun;

/// GoDaddy `domains/available` REST adapter
pub mod godaddy;

pub use godaddy::{GoDaddyAvailability, GoDaddyClient};
pub use porkbun::{
    PorkbunAvailability, PorkbunCheckResponse, PorkbunClient, PorkbunLimits, PorkbunPrice,
};
pub use whois::{parse_whois_record, WhoisClient, WhoisRecord};

use crate::error::DomainCheckError;
use crate::types::{CheckConfig, ProviderCredentials, ProviderKind};
use async_trait::async_trait;
use std::sync::Arc;

/// Provider-specific answer, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Whois(WhoisRecord),
    Porkbun(PorkbunCheckResponse),
    GoDaddy(GoDaddyAvailability),
}

/// A backend capable of answering one availability check.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Issue one check. Credentials are ignored by adapters that don't need them.
    async fn check(
        &self,
        domain: &str,
        credentials: Option<&ProviderCredentials>,
    ) -> Result<RawResponse, DomainCheckError>;
}

/// One adapter per provider, shared cheaply between clones of a resolver.
#[derive(Clone)]
pub struct ProviderSet {
    whois: Arc<dyn ProviderAdapter>,
    porkbun: Arc<dyn ProviderAdapter>,
    godaddy: Arc<dyn ProviderAdapter>,
}

impl ProviderSet {
    /// Assemble a set from explicit adapters (custom backends, test doubles).
    pub fn new(
        whois: Arc<dyn ProviderAdapter>,
        porkbun: Arc<dyn ProviderAdapter>,
        godaddy: Arc<dyn ProviderAdapter>,
    ) -> Self {
        Self {
            whois,
            porkbun,
            godaddy,
        }
    }

    /// Build the stock adapters from configuration.
    pub fn from_config(config: &CheckConfig) -> Result<Self, DomainCheckError> {
        Ok(Self {
            whois: Arc::new(WhoisClient::new()),
            porkbun: Arc::new(PorkbunClient::with_config(
                &config.porkbun_base_url,
                config.porkbun_timeout,
            )?),
            godaddy: Arc::new(GoDaddyClient::with_config(
                &config.godaddy_base_url,
                config.godaddy_timeout,
            )?),
        })
    }

    /// Adapter for a provider.
    pub fn get(&self, kind: ProviderKind) -> &Arc<dyn ProviderAdapter> {
        match kind {
            ProviderKind::Whois => &self.whois,
            ProviderKind::Porkbun => &self.porkbun,
            ProviderKind::GoDaddy => &self.godaddy,
        }
    }
}

/// Build a reqwest client with a per-request timeout.
pub(crate) fn build_http_client(
    provider: ProviderKind,
    timeout: std::time::Duration,
) -> Result<reqwest::Client, DomainCheckError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("domain-avail/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            DomainCheckError::config(format!("Failed to create {} HTTP client: {}", provider, e))
        })
}

/// Pull credentials for a REST adapter or fail as an auth error.
pub(crate) fn require_credentials(
    provider: ProviderKind,
    credentials: Option<&ProviderCredentials>,
) -> Result<&ProviderCredentials, DomainCheckError> {
    match credentials {
        Some(creds) if creds.is_complete() => Ok(creds),
        _ => Err(DomainCheckError::auth(provider, "API key and secret are required")),
    }
}
