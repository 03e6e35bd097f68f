//! Domain name variation generation.
//!
//! Expands a base name across a set of extensions. Everything here is pure:
//! no I/O, no validation against any registry.
//!
//! # Examples
//!
//! ```
//! use domain_avail_lib::expand_variations;
//!
//! assert_eq!(
//!     expand_variations("foo", &["com", ".net"]),
//!     vec!["foo.com".to_string(), "foo.net".to_string()]
//! );
//! ```

use crate::utils::{is_valid_base_name, is_valid_fqdn};

/// Extensions used when a base name is given without any.
pub const DEFAULT_EXTENSIONS: &[&str] = &["com", "net", "org", "io", "app", "co"];

/// Produce `base.ext` for each extension, in extension order.
///
/// Leading dots on extensions are stripped and blank extensions skipped.
/// Duplicates are kept.
pub fn expand_variations<S: AsRef<str>>(base: &str, extensions: &[S]) -> Vec<String> {
    let base = base.trim();

    extensions
        .iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!("{}.{}", base, ext))
        .collect()
}

/// The default extension set as owned strings.
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

/// Expand mixed user input into domain names ready for checking.
///
/// - Entries with a dot are taken as fully qualified and kept as-is
/// - Bare names are expanded across `extensions`
/// - Blank or malformed entries are dropped
pub fn expand_domain_inputs<S: AsRef<str>>(inputs: &[String], extensions: &[S]) -> Vec<String> {
    let mut results = Vec::new();

    for input in inputs {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.contains('.') {
            if is_valid_fqdn(trimmed) {
                results.push(trimmed.to_string());
            } else {
                tracing::debug!(input = trimmed, "skipping malformed domain");
            }
        } else if is_valid_base_name(trimmed) {
            results.extend(expand_variations(trimmed, extensions));
        } else {
            tracing::debug!(input = trimmed, "skipping malformed base name");
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_variations() {
        assert_eq!(expand_variations("foo", &["com", "net"]), vec!["foo.com", "foo.net"]);
        assert_eq!(expand_variations("foo", &[".com"]), vec!["foo.com"]);
    }

    #[test]
    fn test_expand_variations_skips_blank_extensions() {
        assert_eq!(expand_variations("foo", &["", " . ", "io"]), vec!["foo.io"]);
        assert!(expand_variations("foo", &[] as &[&str]).is_empty());
    }

    #[test]
    fn test_expand_variations_keeps_duplicates_in_order() {
        assert_eq!(
            expand_variations("foo", &["net", "com", "net"]),
            vec!["foo.net", "foo.com", "foo.net"]
        );
    }

    #[test]
    fn test_default_extensions() {
        assert_eq!(
            expand_variations("noteforget", DEFAULT_EXTENSIONS),
            vec![
                "noteforget.com",
                "noteforget.net",
                "noteforget.org",
                "noteforget.io",
                "noteforget.app",
                "noteforget.co"
            ]
        );
    }

    #[test]
    fn test_expand_domain_inputs() {
        let inputs = vec![
            "example".to_string(),
            "test.com".to_string(),
            "".to_string(),
            "a".to_string(),
            "bad..com".to_string(),
        ];
        let result = expand_domain_inputs(&inputs, &["com", "org"]);
        assert_eq!(result, vec!["example.com", "example.org", "test.com"]);
    }
}
