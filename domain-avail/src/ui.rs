//! Terminal display for domain-avail.
//!
//! Colored result lines, the run header, the summary bar and a stderr
//! spinner. JSON output bypasses this module entirely.

use console::{pad_str, style, Alignment, Term};
use domain_avail_lib::{
    labels, Availability, BatchSummary, CheckConfig, CheckResult, ExecutionPolicy, ProviderKind,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut frame = 0usize;
            while flag.load(Ordering::Relaxed) {
                let glyph = SPINNER_FRAMES[frame % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(glyph).cyan(), message));
                frame += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

pub fn print_header(domain_count: usize, config: &CheckConfig, provider: ProviderKind) {
    println!(
        "{} {} {}",
        style("domain-avail").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "Checking {} domain{}",
            domain_count,
            if domain_count == 1 { "" } else { "s" }
        ))
        .dim(),
    );
    println!("{}", style(header_meta(config, provider)).dim());
    println!();
}

fn header_meta(config: &CheckConfig, provider: ProviderKind) -> String {
    let mut parts = vec![
        format!("Provider: {}", provider),
        format!("Mode: {}", config.policy),
    ];
    match config.policy {
        ExecutionPolicy::Parallel => parts.push(format!("Concurrency: {}", config.concurrency)),
        ExecutionPolicy::Sequential => {
            parts.push(format!("Delay: {}ms", config.request_delay.as_millis()))
        }
    }
    parts.join(" | ")
}

// ── Result lines ─────────────────────────────────────────────────────────────

/// Print one result line, plus the raw error detail under `--debug`.
pub fn print_result(result: &CheckResult, debug: bool) {
    let padded = pad_str(result.domain(), 30, Alignment::Left, Some(".."));
    let detail = result_detail(result);
    let detail = if detail.is_empty() {
        String::new()
    } else {
        format!("  {}", style(detail).dim())
    };

    let status = match result.availability() {
        Availability::Available => style("AVAILABLE").green().bold(),
        Availability::Registered => style("TAKEN").red().bold(),
        Availability::Unknown => style("UNKNOWN").yellow(),
    };

    println!("  {}  {}{}", style(&padded).white(), status, detail);

    if debug {
        if let Some(error) = result.error_detail() {
            println!("    {} {} via {}", style("└─").dim(), error, result.provider());
        }
    }
}

/// Secondary text for a result line: label, price and registration facts.
fn result_detail(result: &CheckResult) -> String {
    let mut parts = Vec::new();

    let plain_label = matches!(result.status_label(), labels::AVAILABLE | labels::REGISTERED);
    if !plain_label {
        parts.push(result.status_label().to_string());
    }

    if let Some(retry) = result.retry_after_seconds() {
        parts.push(format!("retry in {}s", retry));
    }
    if let Some(price) = result.price() {
        match result.renewal_price() {
            Some(renewal) => parts.push(format!("${} (renews ${})", price, renewal)),
            None => parts.push(format!("${}", price)),
        }
    }
    if let Some(registrar) = result.registrar() {
        parts.push(format!("Registrar: {}", registrar));
    }
    if let Some(expires) = result.expiration_date() {
        parts.push(format!("Expires: {}", expires));
    }

    parts.join(", ")
}

// ── Summary ──────────────────────────────────────────────────────────────────

pub fn print_summary(summary: &BatchSummary, duration: Duration) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(summary.total).bold(),
        if summary.total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", summary.available)).green(),
        style("|").dim(),
        style(format!("{} taken", summary.registered)).red(),
        style("|").dim(),
        style(format!("{} unknown", summary.unknown)).yellow(),
    );
}

/// Tell the user how long to wait before retrying throttled checks.
pub fn print_rate_limit_notice(summary: &BatchSummary) {
    if let Some(wait) = summary.max_retry_after_seconds {
        println!(
            "  {} {} check{} rate limited, retry in {}s",
            style("•").dim(),
            summary.rate_limited,
            if summary.rate_limited == 1 { " was" } else { "s were" },
            wait,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_hides_plain_labels() {
        let result = CheckResult::available("a.com", ProviderKind::Whois);
        assert_eq!(result_detail(&result), "");
    }

    #[test]
    fn test_detail_with_pricing() {
        let result = CheckResult::available("a.com", ProviderKind::Porkbun)
            .with_pricing(Some("9.68".into()), Some("10.81".into()));
        assert_eq!(result_detail(&result), "$9.68 (renews $10.81)");
    }

    #[test]
    fn test_detail_with_registration() {
        let result = CheckResult::registered("b.com", ProviderKind::Whois).with_registration(
            Some("MarkMonitor Inc.".into()),
            None,
            Some("2030-01-01".into()),
        );
        assert_eq!(
            result_detail(&result),
            "Registrar: MarkMonitor Inc., Expires: 2030-01-01"
        );
    }

    #[test]
    fn test_detail_rate_limited() {
        let result = CheckResult::rate_limited("c.com", ProviderKind::Porkbun, 12);
        assert_eq!(result_detail(&result), "Rate Limited, retry in 12s");
    }

    #[test]
    fn test_header_meta_by_policy() {
        let config = CheckConfig::default();
        assert_eq!(
            header_meta(&config, ProviderKind::Whois),
            "Provider: WHOIS | Mode: sequential | Delay: 100ms"
        );

        let config = config
            .with_policy(ExecutionPolicy::Parallel)
            .with_concurrency(20);
        assert_eq!(
            header_meta(&config, ProviderKind::GoDaddy),
            "Provider: GoDaddy | Mode: parallel | Concurrency: 20"
        );
    }
}
