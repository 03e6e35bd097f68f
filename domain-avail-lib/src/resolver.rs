//! Main domain resolver implementation.
//!
//! `DomainResolver` ties provider selection, the adapters and the normalizer
//! together. It holds no per-check state, so clones are cheap and can be
//! shared across tasks freely.

use crate::concurrent::BatchOrchestrator;
use crate::error::DomainCheckError;
use crate::normalize::normalize;
use crate::providers::ProviderSet;
use crate::types::{
    labels, BatchRequest, CheckConfig, CheckResult, ProviderCredentials, ProviderKind,
};

/// Entry point for availability checks.
///
/// # Example
///
/// ```rust,no_run
/// use domain_avail_lib::{DomainResolver, ProviderKind};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = DomainResolver::new()?;
///     let result = resolver.check_one("example.com", ProviderKind::Whois, None).await;
///     println!("{}: {}", result.domain(), result.status_label());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DomainResolver {
    config: CheckConfig,
    providers: ProviderSet,
}

impl DomainResolver {
    /// Create a resolver with default configuration.
    pub fn new() -> Result<Self, DomainCheckError> {
        Self::with_config(CheckConfig::default())
    }

    /// Create a resolver with custom configuration.
    pub fn with_config(config: CheckConfig) -> Result<Self, DomainCheckError> {
        let providers = ProviderSet::from_config(&config)?;
        Ok(Self { config, providers })
    }

    /// Create a resolver over explicit adapters.
    pub fn with_providers(config: CheckConfig, providers: ProviderSet) -> Self {
        Self { config, providers }
    }

    /// Current configuration.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Check one domain.
    ///
    /// Always yields a result whose `domain` is the input verbatim. A REST
    /// provider without complete credentials silently falls back to WHOIS.
    pub async fn check_one(
        &self,
        domain: &str,
        provider: ProviderKind,
        credentials: Option<&ProviderCredentials>,
    ) -> CheckResult {
        let provider = select_provider(provider, credentials);

        if domain.trim().is_empty() {
            let err = DomainCheckError::invalid_domain(domain, "Domain name cannot be empty");
            return CheckResult::unknown(domain, provider, labels::UNKNOWN)
                .with_error_detail(err.to_string());
        }

        tracing::debug!(domain, %provider, "dispatching check");
        let outcome = self.providers.get(provider).check(domain, credentials).await;
        if let Err(err) = &outcome {
            match err {
                DomainCheckError::RateLimited { .. }
                | DomainCheckError::AuthenticationFailure { .. } => {
                    tracing::warn!(domain, %provider, error = %err, "check rejected by provider");
                }
                _ => tracing::debug!(domain, %provider, error = %err, "check failed"),
            }
        }

        let result = normalize(domain, provider, outcome);
        tracing::debug!(
            domain,
            %provider,
            availability = %result.availability(),
            label = result.status_label(),
            "check complete"
        );
        result
    }

    /// Check a batch under the configured policy, preserving input order.
    pub async fn check_batch(&self, request: BatchRequest) -> Vec<CheckResult> {
        BatchOrchestrator::from_config(&self.config)
            .run(self, request)
            .await
    }
}

/// Pick the adapter for a request.
///
/// A REST provider is used only when both credential parts are non-blank;
/// anything else goes to WHOIS.
pub fn select_provider(
    requested: ProviderKind,
    credentials: Option<&ProviderCredentials>,
) -> ProviderKind {
    if requested.is_rest() && credentials.is_some_and(ProviderCredentials::is_complete) {
        requested
    } else {
        ProviderKind::Whois
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_provider_needs_both_parts() {
        let full = ProviderCredentials::new("pk1", "sk1");
        let half = ProviderCredentials::new("pk1", "");

        assert_eq!(select_provider(ProviderKind::Porkbun, Some(&full)), ProviderKind::Porkbun);
        assert_eq!(select_provider(ProviderKind::GoDaddy, Some(&full)), ProviderKind::GoDaddy);
        assert_eq!(select_provider(ProviderKind::Porkbun, Some(&half)), ProviderKind::Whois);
        assert_eq!(select_provider(ProviderKind::GoDaddy, None), ProviderKind::Whois);
        assert_eq!(select_provider(ProviderKind::Whois, Some(&full)), ProviderKind::Whois);
    }
}
