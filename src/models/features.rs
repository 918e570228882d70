// URL feature model
// Strongly-typed signals extracted once per analyzed URL

use serde::{Deserialize, Serialize};

// =============================================================================
// DOMAIN SHAPE
// =============================================================================

/// Signals computed purely from the parsed URL, no network involved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainShape {
    pub domain: String,
    /// `count('.') - 1`, negative for single-label hosts such as `localhost`
    pub subdomain_count: i64,
    pub has_hyphen: bool,
    pub has_digits: bool,
    pub is_ip_literal: bool,
    pub domain_length: usize,
    pub path_length: usize,
    pub has_query: bool,
    pub special_chars_in_path: usize,
}

// =============================================================================
// PROBE OUTCOMES
// =============================================================================

/// Result of the TLS handshake probe
#[derive(Debug, Clone, PartialEq)]
pub enum TlsProbe {
    /// Handshake completed and the server presented a certificate
    Established { issuer: Option<String> },
    /// Probe failed; the site is treated as having no TLS
    Degraded { reason: String },
}

impl TlsProbe {
    pub fn is_established(&self) -> bool {
        matches!(self, TlsProbe::Established { .. })
    }
}

/// Result of walking the redirect chain with HEAD requests
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectProbe {
    /// Walk ended on a non-redirect response or at the hop cap
    Complete { chain: Vec<String> },
    /// A later hop failed or had no usable `Location`; `chain` holds only the hops that answered
    Truncated { chain: Vec<String>, reason: String },
    /// The very first request failed
    Failed { reason: String },
}

// =============================================================================
// FEATURE SET
// =============================================================================

/// Complete feature set for one URL, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub domain: String,
    pub subdomain_count: i64,
    pub has_hyphen: bool,
    pub has_digits: bool,
    pub is_ip_literal: bool,
    pub domain_length: usize,
    pub path_length: usize,
    pub has_query: bool,
    pub special_chars_in_path: usize,

    pub has_tls: bool,
    pub tls_cert_valid: bool,
    pub tls_issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_error: Option<String>,

    pub has_redirects: bool,
    pub redirect_count: usize,
    pub redirect_chain: Vec<String>,
    pub final_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_error: Option<String>,

    pub domain_age_suspicious: bool,
}

impl FeatureSet {
    /// Assemble the feature set from the individual extraction stages
    pub fn assemble(
        url: &str,
        shape: DomainShape,
        tls: TlsProbe,
        redirects: RedirectProbe,
        domain_age_suspicious: bool,
    ) -> Self {
        let (has_tls, tls_issuer, tls_error) = match tls {
            TlsProbe::Established { issuer } => (true, issuer, None),
            TlsProbe::Degraded { reason } => (false, None, Some(reason)),
        };

        let (redirect_chain, redirect_error) = match redirects {
            RedirectProbe::Complete { chain } => (chain, None),
            RedirectProbe::Truncated { chain, reason } => (chain, Some(reason)),
            RedirectProbe::Failed { reason } => (vec![url.to_string()], Some(reason)),
        };
        let redirect_chain = if redirect_chain.is_empty() {
            vec![url.to_string()]
        } else {
            redirect_chain
        };
        let redirect_count = redirect_chain.len() - 1;
        let final_url = redirect_chain
            .last()
            .cloned()
            .unwrap_or_else(|| url.to_string());

        Self {
            domain: shape.domain,
            subdomain_count: shape.subdomain_count,
            has_hyphen: shape.has_hyphen,
            has_digits: shape.has_digits,
            is_ip_literal: shape.is_ip_literal,
            domain_length: shape.domain_length,
            path_length: shape.path_length,
            has_query: shape.has_query,
            special_chars_in_path: shape.special_chars_in_path,
            has_tls,
            tls_cert_valid: has_tls,
            tls_issuer,
            tls_error,
            has_redirects: redirect_count > 0,
            redirect_count,
            redirect_chain,
            final_url,
            redirect_error,
            domain_age_suspicious,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> DomainShape {
        DomainShape {
            domain: "example.com".to_string(),
            subdomain_count: 0,
            has_hyphen: false,
            has_digits: false,
            is_ip_literal: false,
            domain_length: 11,
            path_length: 1,
            has_query: false,
            special_chars_in_path: 0,
        }
    }

    #[test]
    fn test_failed_redirect_probe_degrades_to_input_url() {
        let features = FeatureSet::assemble(
            "https://example.com",
            shape(),
            TlsProbe::Degraded {
                reason: "connection refused".to_string(),
            },
            RedirectProbe::Failed {
                reason: "timeout".to_string(),
            },
            false,
        );

        assert!(!features.has_tls);
        assert!(!features.tls_cert_valid);
        assert_eq!(features.tls_issuer, None);
        assert_eq!(features.redirect_count, 0);
        assert!(!features.has_redirects);
        assert_eq!(features.redirect_chain, vec!["https://example.com"]);
        assert_eq!(features.final_url, "https://example.com");
        assert_eq!(features.redirect_error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_truncated_chain_keeps_accumulated_hops() {
        let chain = vec![
            "http://a.example".to_string(),
            "http://b.example".to_string(),
            "http://c.example".to_string(),
        ];
        let features = FeatureSet::assemble(
            "http://a.example",
            shape(),
            TlsProbe::Established {
                issuer: Some("CN=Test CA".to_string()),
            },
            RedirectProbe::Truncated {
                chain: chain.clone(),
                reason: "connection reset".to_string(),
            },
            false,
        );

        assert!(features.has_tls);
        assert_eq!(features.tls_issuer.as_deref(), Some("CN=Test CA"));
        assert_eq!(features.redirect_count, 2);
        assert_eq!(features.redirect_chain.len(), features.redirect_count + 1);
        assert_eq!(features.final_url, "http://c.example");
    }
}
