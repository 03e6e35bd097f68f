//! WHOIS adapter for domain availability checking.
//!
//! Runs the system's `whois` command and extracts the handful of fields the
//! normalizer needs. The adapter imposes no timeout of its own; the `whois`
//! client's built-in limits apply. A response that carries a "no match"
//! marker is reported as an error whose message is the matching line, which
//! the classifier later reads as "Likely Available".

use crate::error::DomainCheckError;
use crate::providers::{ProviderAdapter, RawResponse};
use crate::types::{ProviderCredentials, ProviderKind};
use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

/// Fields parsed out of a WHOIS text record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhoisRecord {
    /// `Domain Name:` value; absent means nothing is registered under this name
    pub domain_name: Option<String>,
    pub registrar: Option<String>,
    pub creation_date: Option<String>,
    pub expiration_date: Option<String>,
}

lazy_static::lazy_static! {
    static ref DOMAIN_NAME_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*Domain Name:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*Domain:[ \t]*(\S.*?)\s*$",
    ]);
    static ref REGISTRAR_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*Registrar:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*Registrar Name:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*Sponsoring Registrar:[ \t]*(\S.*?)\s*$",
    ]);
    static ref CREATION_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*Creation Date:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*Created:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*Registered on:[ \t]*(\S.*?)\s*$",
    ]);
    static ref EXPIRATION_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*Registry Expiry Date:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*Registrar Registration Expiration Date:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*Expiration Date:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*Expiry Date:[ \t]*(\S.*?)\s*$",
        r"(?im)^\s*paid-till:[ \t]*(\S.*?)\s*$",
    ]);
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

/// Markers registries use when nothing is registered under the name.
const NO_MATCH_MARKERS: &[&str] = &[
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "status: free",
    "status: available",
];

/// WHOIS client backed by the system `whois` binary.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    /// Executable to run
    command: String,
}

impl WhoisClient {
    /// Create a client that runs `whois` from `PATH`.
    pub fn new() -> Self {
        Self {
            command: "whois".to_string(),
        }
    }

    /// Create a client that runs a specific executable.
    pub fn with_command<C: Into<String>>(command: C) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Query the registry for one domain.
    ///
    /// # Errors
    ///
    /// Returns `DomainCheckError::WhoisUnavailable` if the `whois` command
    /// cannot be executed or produced no output, and
    /// `DomainCheckError::RegistryLookup` if the response says nothing matches.
    pub async fn lookup(&self, domain: &str) -> Result<WhoisRecord, DomainCheckError> {
        let output = Command::new(&self.command)
            .arg(domain)
            .output()
            .await
            .map_err(|e| {
                DomainCheckError::whois_unavailable(format!(
                    "Failed to execute whois command: {}. Make sure 'whois' is installed.",
                    e
                ))
            })?;

        let text = String::from_utf8_lossy(&output.stdout);
        if text.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(DomainCheckError::whois_unavailable(if stderr.is_empty() {
                format!("whois returned no data for {}", domain)
            } else {
                format!("whois returned no data for {}: {}", domain, stderr)
            }));
        }

        tracing::debug!(domain, bytes = text.len(), "whois response received");
        parse_whois_record(&text)
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for WhoisClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Whois
    }

    async fn check(
        &self,
        domain: &str,
        _credentials: Option<&ProviderCredentials>,
    ) -> Result<RawResponse, DomainCheckError> {
        self.lookup(domain).await.map(RawResponse::Whois)
    }
}

/// Parse WHOIS output into a record.
///
/// Fails with the offending line when the text contains a no-match marker.
pub fn parse_whois_record(text: &str) -> Result<WhoisRecord, DomainCheckError> {
    if let Some(line) = find_no_match_line(text) {
        return Err(DomainCheckError::registry(line));
    }

    Ok(WhoisRecord {
        domain_name: extract_field(text, &DOMAIN_NAME_PATTERNS),
        registrar: extract_field(text, &REGISTRAR_PATTERNS),
        creation_date: extract_field(text, &CREATION_PATTERNS),
        expiration_date: extract_field(text, &EXPIRATION_PATTERNS),
    })
}

fn find_no_match_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| {
            let lower = line.to_lowercase();
            NO_MATCH_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .map(String::from)
}

/// First capture across the patterns, in order.
fn extract_field(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
