// Caller-side URL validation
// Trims, adds a scheme when none is given, and rejects anything that is not a
// well-formed http(s) URL with a host before it reaches feature extraction.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use url::Url;

pub const MAX_URL_LENGTH: usize = 2048;

lazy_static! {
    /// Any explicit scheme such as `ftp:`, `javascript:`, `data:`
    static ref SCHEME_PATTERN: Regex =
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").expect("Invalid scheme pattern regex");

    /// `host:port` without a scheme, which the scheme pattern would otherwise catch
    static ref HOST_PORT_PATTERN: Regex =
        Regex::new(r"^[a-zA-Z0-9.\-]+:\d+(/.*)?$").expect("Invalid host:port pattern regex");
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL too long (max {max}, current {current})")]
    TooLong { max: usize, current: usize },

    #[error("Unsupported scheme: {0}. Only HTTP and HTTPS are supported")]
    UnsupportedScheme(String),

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Missing host in URL")]
    MissingHost,
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Normalize `input` into an absolute http(s) URL string.
///
/// `google.com` becomes `https://google.com/`; explicit `http://` is kept.
pub fn normalize_and_validate(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let current = trimmed.chars().count();
    if current > MAX_URL_LENGTH {
        return Err(ValidationError::TooLong {
            max: MAX_URL_LENGTH,
            current,
        });
    }

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else if SCHEME_PATTERN.is_match(trimmed) && !HOST_PORT_PATTERN.is_match(trimmed) {
        let scheme = trimmed.split(':').next().unwrap_or_default();
        return Err(ValidationError::UnsupportedScheme(scheme.to_lowercase()));
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| ValidationError::InvalidFormat(format!("{}: {}", trimmed, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => {},
        _ => return Err(ValidationError::MissingHost),
    }

    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_added() {
        assert_eq!(
            normalize_and_validate("google.com").unwrap(),
            "https://google.com/"
        );
        assert_eq!(
            normalize_and_validate("  example.com/login?x=1  ").unwrap(),
            "https://example.com/login?x=1"
        );
        assert_eq!(
            normalize_and_validate("localhost:8080/admin").unwrap(),
            "https://localhost:8080/admin"
        );
    }

    #[test]
    fn test_explicit_scheme_is_kept() {
        assert_eq!(
            normalize_and_validate("http://192.168.1.1").unwrap(),
            "http://192.168.1.1/"
        );
        assert_eq!(
            normalize_and_validate("HTTPS://Example.com/A").unwrap(),
            "https://example.com/A"
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(normalize_and_validate(""), Err(ValidationError::Empty));
        assert_eq!(normalize_and_validate("   "), Err(ValidationError::Empty));
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(matches!(
            normalize_and_validate("not a url"),
            Err(ValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            normalize_and_validate("http://"),
            Err(ValidationError::InvalidFormat(_)) | Err(ValidationError::MissingHost)
        ));
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert_eq!(
            normalize_and_validate("ftp://files.example.com"),
            Err(ValidationError::UnsupportedScheme("ftp".to_string()))
        );
        assert_eq!(
            normalize_and_validate("javascript:alert(1)"),
            Err(ValidationError::UnsupportedScheme("javascript".to_string()))
        );
    }

    #[test]
    fn test_too_long_rejected() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            normalize_and_validate(&url),
            Err(ValidationError::TooLong { max: MAX_URL_LENGTH, .. })
        ));
    }
}
