// URL feature extraction
// Domain shape from the parsed URL plus the TLS and redirect probes

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use url::{Host, Url};

use crate::models::features::{DomainShape, FeatureSet};
use crate::services::site_probe::SiteProbe;

/// Reserved characters counted in the URL path
const PATH_SPECIAL_CHARS: &[char] = &[
    '@', '!', '$', '&', '\'', '(', ')', '*', '+', ',', ';', '=', ':',
];

lazy_static! {
    /// Dotted-decimal prefix; also catches hosts such as `192.168.1.1.evil.com`
    static ref IPV4_PREFIX_PATTERN: Regex =
        Regex::new(r"^\d+\.\d+\.\d+\.\d+").expect("Invalid IPv4 prefix regex");
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

impl DomainShape {
    pub fn from_url(url: &Url) -> Result<Self, ExtractionError> {
        let host = url
            .host()
            .ok_or_else(|| ExtractionError::MissingHost(url.to_string()))?;

        let domain = host.to_string().to_lowercase();
        if domain.is_empty() {
            return Err(ExtractionError::MissingHost(url.to_string()));
        }
        let is_ip_literal =
            matches!(host, Host::Ipv4(_) | Host::Ipv6(_)) || IPV4_PREFIX_PATTERN.is_match(&domain);

        // A bare root path counts as no path
        let path = match url.path() {
            "/" => "",
            path => path,
        };

        Ok(Self {
            subdomain_count: domain.matches('.').count() as i64 - 1,
            has_hyphen: domain.contains('-'),
            has_digits: domain.chars().any(|c| c.is_ascii_digit()),
            is_ip_literal,
            domain_length: domain.chars().count(),
            path_length: path.chars().count(),
            has_query: url.query().map_or(false, |q| !q.is_empty()),
            special_chars_in_path: path.chars().filter(|c| PATH_SPECIAL_CHARS.contains(c)).count(),
            domain,
        })
    }

    pub fn parse(url: &str) -> Result<Self, ExtractionError> {
        let parsed =
            Url::parse(url).map_err(|e| ExtractionError::InvalidUrl(format!("{}: {}", url, e)))?;
        Self::from_url(&parsed)
    }
}

/// Domain age lookup. No WHOIS source is wired in, so nothing is ever flagged.
pub fn check_domain_age(_domain: &str) -> bool {
    false
}

pub struct FeatureExtractor {
    probe: Arc<dyn SiteProbe>,
}

impl FeatureExtractor {
    pub fn new(probe: Arc<dyn SiteProbe>) -> Self {
        Self { probe }
    }

    /// Extract the full feature set. Only structural URL problems are errors;
    /// probe failures degrade the corresponding features.
    pub async fn extract(&self, url: &str) -> Result<FeatureSet, ExtractionError> {
        let parsed =
            Url::parse(url).map_err(|e| ExtractionError::InvalidUrl(format!("{}: {}", url, e)))?;
        let shape = DomainShape::from_url(&parsed)?;

        let (tls, redirects) = tokio::join!(
            self.probe.probe_tls(&shape.domain),
            self.probe.probe_redirects(url)
        );
        let domain_age_suspicious = check_domain_age(&shape.domain);

        let features = FeatureSet::assemble(url, shape, tls, redirects, domain_age_suspicious);
        debug!(
            "Extracted features for {}: tls={}, redirects={}, ip={}",
            url, features.has_tls, features.redirect_count, features.is_ip_literal
        );

        Ok(features)
    }
}
