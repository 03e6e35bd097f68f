//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, merging the
//! discovered files with proper precedence, and reading `DA_*` environment
//! variables. Credentials are only ever read from the environment, never
//! from files.

use crate::error::DomainCheckError;
use crate::types::{CheckConfig, ExecutionPolicy, ProviderCredentials, ProviderKind};
use crate::utils::parse_timeout_string;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Provider API roots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<EndpointsConfig>,

    /// Per-provider request timeouts ("10s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeouts: Option<TimeoutsConfig>,
}

/// Default values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// whois | porkbun | godaddy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// sequential | parallel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Sequential inter-request delay in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    /// Extensions used to expand bare names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EndpointsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub porkbun: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub godaddy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TimeoutsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub porkbun: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub godaddy: Option<String>,
}

impl FileConfig {
    /// Provider named in `[defaults]`, if any.
    pub fn provider(&self) -> Result<Option<ProviderKind>, DomainCheckError> {
        self.defaults
            .as_ref()
            .and_then(|d| d.provider.as_deref())
            .map(str::parse::<ProviderKind>)
            .transpose()
    }

    /// Extensions named in `[defaults]`, if any.
    pub fn extensions(&self) -> Option<Vec<String>> {
        self.defaults.as_ref().and_then(|d| d.extensions.clone())
    }

    /// Layer this file's settings over an engine configuration.
    pub fn apply_to(&self, mut config: CheckConfig) -> Result<CheckConfig, DomainCheckError> {
        if let Some(defaults) = &self.defaults {
            if let Some(policy) = &defaults.policy {
                config = config.with_policy(policy.parse()?);
            }
            if let Some(concurrency) = defaults.concurrency {
                config = config.with_concurrency(concurrency);
            }
            if let Some(delay_ms) = defaults.delay_ms {
                config = config.with_request_delay(Duration::from_millis(delay_ms));
            }
        }

        if let Some(endpoints) = &self.endpoints {
            if let Some(url) = &endpoints.porkbun {
                config = config.with_porkbun_base_url(url.as_str());
            }
            if let Some(url) = &endpoints.godaddy {
                config = config.with_godaddy_base_url(url.as_str());
            }
        }

        if let Some(timeouts) = &self.timeouts {
            if let Some(timeout) = &timeouts.porkbun {
                config = config.with_porkbun_timeout(require_timeout(timeout)?);
            }
            if let Some(timeout) = &timeouts.godaddy {
                config = config.with_godaddy_timeout(require_timeout(timeout)?);
            }
        }

        Ok(config)
    }
}

fn require_timeout(value: &str) -> Result<Duration, DomainCheckError> {
    parse_timeout_string(value).ok_or_else(|| {
        DomainCheckError::config(format!(
            "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
            value
        ))
    })
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which files were loaded
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, not valid TOML,
    /// or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainCheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainCheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainCheckError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG is loaded first, then the home directory file, then the local
    /// file; later files override earlier ones field by field. Files that
    /// fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainCheckError> {
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                }
            }
        }

        if self.verbose {
            for path in &loaded_files {
                tracing::info!(path = %path.display(), "loaded config file");
            }
        }

        Ok(merged_config)
    }

    /// Local configuration in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./domain-avail.toml", "./.domain-avail.toml"]
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Configuration in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let path = Path::new(&home).join(".domain-avail.toml");
        path.exists().then_some(path)
    }

    /// Configuration under the XDG config directory.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-avail").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(lower), Some(higher)) => Some(DefaultsConfig {
                    provider: higher.provider.or(lower.provider),
                    policy: higher.policy.or(lower.policy),
                    concurrency: higher.concurrency.or(lower.concurrency),
                    delay_ms: higher.delay_ms.or(lower.delay_ms),
                    extensions: higher.extensions.or(lower.extensions),
                }),
                (lower, higher) => higher.or(lower),
            },
            endpoints: match (lower.endpoints, higher.endpoints) {
                (Some(lower), Some(higher)) => Some(EndpointsConfig {
                    porkbun: higher.porkbun.or(lower.porkbun),
                    godaddy: higher.godaddy.or(lower.godaddy),
                }),
                (lower, higher) => higher.or(lower),
            },
            timeouts: match (lower.timeouts, higher.timeouts) {
                (Some(lower), Some(higher)) => Some(TimeoutsConfig {
                    porkbun: higher.porkbun.or(lower.porkbun),
                    godaddy: higher.godaddy.or(lower.godaddy),
                }),
                (lower, higher) => higher.or(lower),
            },
        }
    }

    /// Validate a configuration for common issues.
    pub fn validate_config(&self, config: &FileConfig) -> Result<(), DomainCheckError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(DomainCheckError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            if let Some(provider) = &defaults.provider {
                provider.parse::<ProviderKind>()?;
            }

            if let Some(policy) = &defaults.policy {
                policy.parse::<ExecutionPolicy>()?;
            }

            if let Some(extensions) = &defaults.extensions {
                validate_extensions(extensions)?;
            }
        }

        if let Some(timeouts) = &config.timeouts {
            for timeout in [&timeouts.porkbun, &timeouts.godaddy].into_iter().flatten() {
                require_timeout(timeout)?;
            }
        }

        Ok(())
    }
}

/// Reject empty extensions and extensions containing whitespace.
pub fn validate_extensions(extensions: &[String]) -> Result<(), DomainCheckError> {
    if extensions.is_empty() {
        return Err(DomainCheckError::config("Extension list cannot be empty"));
    }

    for ext in extensions {
        let bare = ext.trim_start_matches('.');
        if bare.is_empty() || bare.contains(char::is_whitespace) {
            return Err(DomainCheckError::config(format!(
                "Invalid extension '{}'",
                ext
            )));
        }
    }

    Ok(())
}

/// Environment variable configuration that mirrors CLI options.
///
/// Populated from `DA_*` variables. Invalid values are dropped with a warning.
#[derive(Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub provider: Option<ProviderKind>,
    pub policy: Option<ExecutionPolicy>,
    pub concurrency: Option<usize>,
    pub delay_ms: Option<u64>,
    pub extensions: Option<Vec<String>>,
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    /// Explicit config file replacing discovery
    pub config: Option<String>,
}

impl EnvConfig {
    /// Credentials when both parts are set.
    pub fn credentials(&self) -> Option<ProviderCredentials> {
        match (&self.api_key, &self.secret_key) {
            (Some(key), Some(secret)) => {
                Some(ProviderCredentials::new(key.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("provider", &self.provider)
            .field("policy", &self.policy)
            .field("concurrency", &self.concurrency)
            .field("delay_ms", &self.delay_ms)
            .field("extensions", &self.extensions)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("config", &self.config)
            .finish()
    }
}

/// Load configuration from the process environment.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
    let mut env_config = EnvConfig::default();

    if let Some(val) = get("DA_PROVIDER") {
        match val.parse::<ProviderKind>() {
            Ok(provider) => env_config.provider = Some(provider),
            Err(e) => tracing::warn!(value = %val, error = %e, "ignoring DA_PROVIDER"),
        }
    }

    if let Some(val) = get("DA_POLICY") {
        match val.parse::<ExecutionPolicy>() {
            Ok(policy) => env_config.policy = Some(policy),
            Err(e) => tracing::warn!(value = %val, error = %e, "ignoring DA_POLICY"),
        }
    }

    if let Some(val) = get("DA_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(concurrency) if (1..=100).contains(&concurrency) => {
                env_config.concurrency = Some(concurrency)
            }
            _ => tracing::warn!(value = %val, "ignoring DA_CONCURRENCY, must be 1-100"),
        }
    }

    if let Some(val) = get("DA_DELAY_MS") {
        match val.trim().parse::<u64>() {
            Ok(delay) => env_config.delay_ms = Some(delay),
            Err(_) => tracing::warn!(value = %val, "ignoring DA_DELAY_MS, expected milliseconds"),
        }
    }

    if let Some(val) = get("DA_EXTENSIONS") {
        let extensions: Vec<String> = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        match validate_extensions(&extensions) {
            Ok(()) => env_config.extensions = Some(extensions),
            Err(e) => tracing::warn!(value = %val, error = %e, "ignoring DA_EXTENSIONS"),
        }
    }

    env_config.api_key = get("DA_API_KEY").map(|v| v.trim().to_string());
    env_config.secret_key = get("DA_SECRET_KEY").map(|v| v.trim().to_string());
    env_config.config = get("DA_CONFIG");

    env_config
}
