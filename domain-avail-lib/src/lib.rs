//! # Domain Avail Library
//!
//! A domain availability resolution engine over WHOIS and registrar REST APIs.
//!
//! Every backend answer, including transport failures and throttling, is
//! normalized into one [`CheckResult`] model. Batches run sequentially with a
//! fixed delay or in parallel under a worker cap, and always return one result
//! per input in input order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_avail_lib::{BatchRequest, DomainResolver, ProviderKind, ProviderCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = DomainResolver::new()?;
//!     let request = BatchRequest::new(
//!         domain_avail_lib::expand_variations("noteforget", &["com", "dev"]),
//!         ProviderKind::Porkbun,
//!     )
//!     .with_credentials(ProviderCredentials::new("pk1_...", "sk1_..."));
//!
//!     for result in resolver.check_batch(request).await {
//!         println!("{} - {}", result.domain(), result.status_label());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Providers
//!
//! - **WHOIS**: the system `whois` client, no credentials needed
//! - **Porkbun**: `checkDomain` endpoint, API key + secret
//! - **GoDaddy**: `domains/available` endpoint, API key + secret
//!
//! A REST provider requested without complete credentials silently falls
//! back to WHOIS.

// Re-export main public API types and functions
pub use concurrent::{BatchOrchestrator, MAX_CONCURRENCY};
pub use config::{
    load_env_config, load_env_config_from, ConfigManager, DefaultsConfig, EndpointsConfig,
    EnvConfig, FileConfig, TimeoutsConfig,
};
pub use error::DomainCheckError;
pub use generate::{default_extensions, expand_domain_inputs, expand_variations, DEFAULT_EXTENSIONS};
pub use providers::{ProviderAdapter, ProviderSet, RawResponse};
pub use resolver::{select_provider, DomainResolver};
pub use types::{
    labels, Availability, BatchRequest, BatchSummary, CheckConfig, CheckResult, ExecutionPolicy,
    ProviderCredentials, ProviderKind, DEFAULT_GODADDY_BASE_URL, DEFAULT_PORKBUN_BASE_URL,
};
pub use utils::{parse_timeout_string, validate_domain};

// Public modules
pub mod classify;
pub mod generate;
pub mod normalize;
pub mod providers;

// Internal modules
mod concurrent;
mod config;
mod error;
mod resolver;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainCheckError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Check one domain with a default-configured resolver.
pub async fn check_one(
    domain: &str,
    provider: ProviderKind,
    credentials: Option<&ProviderCredentials>,
) -> Result<CheckResult> {
    Ok(DomainResolver::new()?
        .check_one(domain, provider, credentials)
        .await)
}

/// Check a batch with a default-configured resolver.
pub async fn check_batch(request: BatchRequest) -> Result<Vec<CheckResult>> {
    Ok(DomainResolver::new()?.check_batch(request).await)
}

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        features: get_enabled_features(),
    }
}

/// Information about the library build and features
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub features: Vec<&'static str>,
}

/// Get list of enabled features at compile time
#[allow(clippy::vec_init_then_push)]
fn get_enabled_features() -> Vec<&'static str> {
    let mut features = Vec::new();

    #[cfg(feature = "whois")]
    features.push("whois");

    #[cfg(feature = "porkbun")]
    features.push("porkbun");

    #[cfg(feature = "godaddy")]
    features.push("godaddy");

    features
}
