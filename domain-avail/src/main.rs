//! Domain Avail CLI Application
//!
//! A command-line interface for checking domain availability over WHOIS,
//! Porkbun or GoDaddy. This is a thin front end over domain-avail-lib: it
//! collects inputs, resolves configuration, runs one batch and prints it.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_avail_lib::{
    default_extensions, expand_domain_inputs, expand_variations, load_env_config, BatchRequest,
    BatchSummary, CheckConfig, ConfigManager, DomainResolver, EnvConfig, ExecutionPolicy,
    FileConfig, ProviderCredentials, ProviderKind,
};
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-avail
#[derive(Parser, Debug)]
#[command(name = "domain-avail")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check domain availability over WHOIS, Porkbun or GoDaddy")]
#[command(
    long_about = "Check domain availability over WHOIS or a registrar REST API.\n\nREST providers need an API key and secret (flags or DA_API_KEY / DA_SECRET_KEY); without them checks go through WHOIS."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain names to check (base names or FQDNs)
    #[arg(value_name = "DOMAINS", help_heading = "Domain Selection")]
    pub domains: Vec<String>,

    /// Base name to expand across extensions
    #[arg(
        short = 'b',
        long = "base",
        value_name = "NAME",
        help_heading = "Domain Selection"
    )]
    pub base: Option<String>,

    /// Extensions for bare names (comma-separated or multiple -e flags)
    #[arg(short = 'e', long = "ext", value_name = "EXT", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Domain Selection")]
    pub extensions: Option<Vec<String>>,

    /// Input file with domains (one per line)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Domain Selection"
    )]
    pub file: Option<String>,

    /// Print the domains that would be checked and exit
    #[arg(long = "dry-run", help_heading = "Domain Selection")]
    pub dry_run: bool,

    /// Provider to query: whois, porkbun or godaddy
    #[arg(long = "provider", value_name = "PROVIDER", help_heading = "Provider")]
    pub provider: Option<String>,

    /// API key for the REST provider
    #[arg(long = "api-key", value_name = "KEY", help_heading = "Provider")]
    pub api_key: Option<String>,

    /// API secret for the REST provider
    #[arg(long = "secret-key", value_name = "SECRET", help_heading = "Provider")]
    pub secret_key: Option<String>,

    /// Check domains concurrently
    #[arg(long = "parallel", conflicts_with = "sequential", help_heading = "Performance")]
    pub parallel: bool,

    /// Check one domain at a time with a delay between requests
    #[arg(long = "sequential", help_heading = "Performance")]
    pub sequential: bool,

    /// Max concurrent checks under --parallel (default: 10, max: 100)
    #[arg(short = 'c', long = "concurrency", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Delay between sequential requests in milliseconds (default: 100)
    #[arg(long = "delay-ms", value_name = "MS", help_heading = "Performance")]
    pub delay_ms: Option<u64>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show detailed debug information and error messages
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Everything a run needs after flags, environment and files are merged.
#[derive(Debug)]
struct RunSettings {
    config: CheckConfig,
    provider: ProviderKind,
    credentials: Option<ProviderCredentials>,
    extensions: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_tracing(&args);
    tracing::info!("domain-avail v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber.
///
/// `-d` / `-v` pick the level for our crates; otherwise `RUST_LOG` applies,
/// defaulting to warnings only.
fn init_tracing(args: &Args) {
    let filter = match (args.debug, args.verbose) {
        (true, _) => EnvFilter::new("warn,domain_avail=debug,domain_avail_lib=debug"),
        (false, true) => EnvFilter::new("warn,domain_avail=info,domain_avail_lib=info"),
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    let has_domains = args.domains.iter().any(|d| !d.trim().is_empty());
    let has_base = args.base.as_deref().is_some_and(|b| !b.trim().is_empty());

    if !has_domains && !has_base && args.file.is_none() {
        return Err(
            "You must specify domain names, a base name with --base, or a file with --file"
                .to_string(),
        );
    }

    if let Some(base) = &args.base {
        if base.trim().contains('.') {
            return Err(format!(
                "Base name '{}' must not contain a dot; use -e to choose extensions",
                base.trim()
            ));
        }
    }

    if let Some(extensions) = &args.extensions {
        if extensions.iter().all(|e| e.trim().trim_start_matches('.').is_empty()) {
            return Err("At least one non-empty extension is required with -e/--ext".to_string());
        }
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(provider) = &args.provider {
        provider
            .parse::<ProviderKind>()
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Main checking logic
async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let settings = build_settings(&args, &env_config)?;
    let domains = get_domains_to_check(&args, &settings.extensions)?;

    if args.dry_run {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&domains)?);
        } else {
            for domain in &domains {
                println!("{}", domain);
            }
        }
        eprintln!("{} domains would be checked", domains.len());
        return Ok(());
    }

    if settings.provider.is_rest() && settings.credentials.is_none() {
        tracing::warn!(
            provider = %settings.provider,
            "no complete API credentials, checking through WHOIS"
        );
    }

    let resolver = DomainResolver::with_config(settings.config.clone())?;
    let mut request = BatchRequest::new(domains, settings.provider);
    if let Some(credentials) = settings.credentials {
        request = request.with_credentials(credentials);
    }

    if !args.json {
        ui::print_header(request.domains.len(), &settings.config, settings.provider);
    }

    let spinner = (!args.json && console::Term::stderr().is_term())
        .then(|| ui::Spinner::start(format!("Checking {} domains...", request.domains.len())));

    let start = Instant::now();
    let results = resolver.check_batch(request).await;
    let duration = start.elapsed();

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }

    display_results(&results, &args, duration)
}

/// Merge configuration layers: CLI > environment > config files > defaults.
fn build_settings(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<RunSettings, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: config files
    let file_config = if let Some(explicit) = args.config.as_ref().or(env_config.config.as_ref()) {
        tracing::info!(path = %explicit, "using explicit config file");
        config_manager
            .load_file(explicit)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit, e))?
    } else {
        match config_manager.discover_and_load() {
            Ok(file_config) => file_config,
            Err(e) => {
                tracing::warn!(error = %e, "config discovery failed, using defaults");
                FileConfig::default()
            }
        }
    };

    let mut config = file_config.apply_to(CheckConfig::default())?;
    let mut provider = file_config.provider()?.unwrap_or(ProviderKind::Whois);
    let mut extensions = file_config.extensions();

    // Step 2: DA_* environment variables
    if let Some(env_provider) = env_config.provider {
        provider = env_provider;
    }
    if let Some(policy) = env_config.policy {
        config = config.with_policy(policy);
    }
    if let Some(concurrency) = env_config.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(delay_ms) = env_config.delay_ms {
        config = config.with_request_delay(Duration::from_millis(delay_ms));
    }
    if env_config.extensions.is_some() {
        extensions = env_config.extensions.clone();
    }

    // Step 3: CLI arguments (highest precedence)
    if let Some(cli_provider) = &args.provider {
        provider = cli_provider.parse()?;
    }
    if args.parallel {
        config = config.with_policy(ExecutionPolicy::Parallel);
    } else if args.sequential {
        config = config.with_policy(ExecutionPolicy::Sequential);
    }
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(delay_ms) = args.delay_ms {
        config = config.with_request_delay(Duration::from_millis(delay_ms));
    }
    if args.extensions.is_some() {
        extensions = args.extensions.clone();
    }

    let api_key = args.api_key.clone().or_else(|| env_config.api_key.clone());
    let secret_key = args.secret_key.clone().or_else(|| env_config.secret_key.clone());
    let credentials = match (api_key, secret_key) {
        (Some(key), Some(secret)) => {
            Some(ProviderCredentials::new(key, secret)).filter(ProviderCredentials::is_complete)
        }
        _ => None,
    };

    Ok(RunSettings {
        config,
        provider,
        credentials,
        extensions: extensions.unwrap_or_else(default_extensions),
    })
}

/// Collect positional domains, file entries and base-name variations.
fn get_domains_to_check(
    args: &Args,
    extensions: &[String],
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut inputs: Vec<String> = args.domains.clone();

    if let Some(file_path) = &args.file {
        inputs.extend(read_domains_from_file(file_path)?);
    }

    let mut domains = expand_domain_inputs(&inputs, extensions);

    if let Some(base) = args.base.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        domains.extend(expand_variations(base, extensions));
    }

    if domains.is_empty() {
        return Err("No valid domains to check.".into());
    }

    Ok(domains)
}

/// Read one domain per line, skipping blanks and `#` comments.
fn read_domains_from_file(file_path: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {}", file_path).into());
    }

    let content = std::fs::read_to_string(path)?;
    let domains: Vec<String> = content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect();

    if domains.is_empty() {
        return Err("No valid domains found in the file.".into());
    }

    tracing::info!(path = %file_path, count = domains.len(), "read domains from file");
    Ok(domains)
}

fn display_results(
    results: &[domain_avail_lib::CheckResult],
    args: &Args,
    duration: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    for result in results {
        ui::print_result(result, args.debug);
    }

    let summary = BatchSummary::from_results(results);
    println!();
    ui::print_summary(&summary, duration);
    ui::print_rate_limit_notice(&summary);

    Ok(())
}
