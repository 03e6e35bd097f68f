//! Error handling for domain checking operations.
//!
//! `DomainCheckError` covers every way a single check can go wrong, from
//! transport faults to provider-declared throttling. Adapters return it, the
//! normalizer folds it into a `CheckResult`, so for check operations it never
//! escapes the engine. Configuration, file and input errors are returned to
//! the caller as ordinary `Result`s.

use crate::types::ProviderKind;
use std::time::Duration;
use thiserror::Error;

/// Main error type for domain checking operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainCheckError {
    /// Input rejected before any provider was contacted.
    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// The provider did not answer within its request timeout.
    #[error("{provider} request timed out after {}s", .timeout.as_secs())]
    Timeout {
        provider: ProviderKind,
        timeout: Duration,
    },

    /// TCP/TLS connection to the provider could not be established.
    #[error("{provider} connection failed: {message}")]
    ConnectionFailed {
        provider: ProviderKind,
        message: String,
    },

    /// Any other transport-level failure.
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: ProviderKind,
        message: String,
    },

    /// Non-success HTTP status without a more specific classification.
    #[error("{provider} returned HTTP {status}")]
    HttpStatus { provider: ProviderKind, status: u16 },

    /// The provider rejected the request shape (HTTP 400).
    #[error("{provider} rejected the request: {message}")]
    BadRequest {
        provider: ProviderKind,
        message: String,
    },

    /// Body was not JSON or lacked the expected fields.
    #[error("{provider} returned a malformed response: {message}")]
    MalformedResponse {
        provider: ProviderKind,
        message: String,
    },

    /// Credentials missing or refused.
    #[error("{provider} rejected the credentials: {message}")]
    AuthenticationFailure {
        provider: ProviderKind,
        message: String,
    },

    /// Provider-declared throttling.
    #[error("{provider} rate limit reached, retry after {retry_after_seconds}s")]
    RateLimited {
        provider: ProviderKind,
        retry_after_seconds: u64,
        message: Option<String>,
    },

    /// Error payload from a REST provider that is neither a limit nor an auth notice.
    #[error("{provider} reported an error: {message}")]
    ProviderError {
        provider: ProviderKind,
        message: String,
    },

    /// The registry answered, but the reply says nothing matched or is ambiguous.
    #[error("{message}")]
    RegistryLookup { message: String },

    /// The WHOIS client could not run or produced no output.
    #[error("{message}")]
    WhoisUnavailable { message: String },

    /// Configuration errors (invalid settings, unparsable files).
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File I/O errors when reading config or domain lists.
    #[error("File error at '{path}': {message}")]
    FileError { path: String, message: String },
}

impl DomainCheckError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(provider: ProviderKind, timeout: Duration) -> Self {
        Self::Timeout { provider, timeout }
    }

    /// Create a new malformed-response error.
    pub fn malformed<M: Into<String>>(provider: ProviderKind, message: M) -> Self {
        Self::MalformedResponse {
            provider,
            message: message.into(),
        }
    }

    /// Create a new authentication error.
    pub fn auth<M: Into<String>>(provider: ProviderKind, message: M) -> Self {
        Self::AuthenticationFailure {
            provider,
            message: message.into(),
        }
    }

    /// Create a new rate-limit error.
    pub fn rate_limited(provider: ProviderKind, retry_after_seconds: u64, message: Option<String>) -> Self {
        Self::RateLimited {
            provider,
            retry_after_seconds,
            message,
        }
    }

    /// Create a new WHOIS lookup error.
    pub fn registry<M: Into<String>>(message: M) -> Self {
        Self::RegistryLookup {
            message: message.into(),
        }
    }

    /// Create a new WHOIS client failure (spawn error, empty output).
    pub fn whois_unavailable<M: Into<String>>(message: M) -> Self {
        Self::WhoisUnavailable {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Map a reqwest failure onto the three transport fault kinds.
    pub fn from_reqwest(provider: ProviderKind, timeout: Duration, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(provider, timeout)
        } else if err.is_connect() {
            Self::ConnectionFailed {
                provider,
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                provider,
                message: err.to_string(),
            }
        }
    }

    /// Check if this error suggests the operation could be retried later.
    ///
    /// WHOIS failures and credential problems are never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::ConnectionFailed { .. }
                | Self::Transport { .. }
                | Self::RateLimited { .. }
                | Self::HttpStatus {
                    status: 500..=599,
                    ..
                }
        )
    }

    /// Retry hint in seconds, only for rate-limit errors.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited {
                retry_after_seconds,
                ..
            } => Some(*retry_after_seconds),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DomainCheckError {
    fn from(err: std::io::Error) -> Self {
        Self::whois_unavailable(format!("I/O error: {}", err))
    }
}
