// Network probes used by feature extraction
// TLS handshake against the target host and a bounded HEAD walk of its redirect chain.
// Probe failures never escape: they are folded into degraded outcomes.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use rustls::{pki_types::ServerName, ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};
use url::Url;

use crate::models::features::{RedirectProbe, TlsProbe};

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("TCP connection failed: {0}")]
    Connect(std::io::Error),

    #[error("TLS handshake failed: {0}")]
    Handshake(String),

    #[error("Invalid TLS server name: {0}")]
    InvalidServerName(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid redirect location: {0}")]
    InvalidLocation(String),

    #[error("Probe setup failed: {0}")]
    Setup(String),
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Hard ceiling on followed redirects, whatever the configuration asks for
pub const MAX_REDIRECT_HOPS: usize = 5;

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Per-attempt timeout for the TLS handshake and for every HEAD request
    pub timeout: Duration,
    pub max_redirects: usize,
    pub tls_port: u16,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_redirects: 5,
            tls_port: 443,
            user_agent: "PhishGuard-Analyzer/1.0".to_string(),
        }
    }
}

// =============================================================================
// PROBE TRAIT
// =============================================================================

#[async_trait]
pub trait SiteProbe: Send + Sync {
    /// Attempt a TLS handshake with `host`
    async fn probe_tls(&self, host: &str) -> TlsProbe;

    /// Follow redirects from `url` with HEAD requests, up to the configured hop cap
    async fn probe_redirects(&self, url: &str) -> RedirectProbe;
}

pub fn is_redirect_status(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Resolve a `Location` header against the URL that produced it
pub fn resolve_location(current: &str, location: &str) -> Result<String, ProbeError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return Url::parse(location)
            .map(|u| u.to_string())
            .map_err(|e| ProbeError::InvalidLocation(format!("{}: {}", location, e)));
    }

    let base = Url::parse(current)
        .map_err(|e| ProbeError::InvalidLocation(format!("{}: {}", current, e)))?;
    base.join(location)
        .map(|u| u.to_string())
        .map_err(|e| ProbeError::InvalidLocation(format!("{}: {}", location, e)))
}

// =============================================================================
// LIVE PROBE
// =============================================================================

pub struct LiveSiteProbe {
    config: ProbeConfig,
    http_client: reqwest::Client,
    tls_connector: TlsConnector,
}

impl LiveSiteProbe {
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls_config = ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(|e| ProbeError::Setup(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();

        Ok(Self {
            config,
            http_client,
            tls_connector: TlsConnector::from(Arc::new(tls_config)),
        })
    }

    async fn handshake(&self, host: &str) -> Result<Option<String>, ProbeError> {
        // IPv6 hosts arrive bracketed from URL parsing
        let host = host.trim_start_matches('[').trim_end_matches(']');

        let server_name = ServerName::try_from(host)
            .map_err(|e| ProbeError::InvalidServerName(format!("{}: {}", host, e)))?
            .to_owned();

        let stream = TcpStream::connect((host, self.config.tls_port))
            .await
            .map_err(ProbeError::Connect)?;

        let tls_stream = self
            .tls_connector
            .connect(server_name, stream)
            .await
            .map_err(|e| ProbeError::Handshake(e.to_string()))?;

        let (_, connection) = tls_stream.get_ref();
        let issuer = connection
            .peer_certificates()
            .and_then(|certs| certs.first())
            .and_then(|leaf| {
                x509_parser::parse_x509_certificate(leaf.as_ref())
                    .ok()
                    .map(|(_, cert)| cert.issuer().to_string())
            });

        Ok(issuer)
    }

    async fn head_status(&self, url: &str) -> Result<(u16, Option<String>), ProbeError> {
        let response = self.http_client.head(url).send().await?;
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok((response.status().as_u16(), location))
    }
}

#[async_trait]
impl SiteProbe for LiveSiteProbe {
    async fn probe_tls(&self, host: &str) -> TlsProbe {
        let outcome = match tokio::time::timeout(self.config.timeout, self.handshake(host)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.config.timeout)),
        };

        match outcome {
            Ok(issuer) => {
                debug!("TLS handshake with {} succeeded (issuer: {:?})", host, issuer);
                TlsProbe::Established { issuer }
            },
            Err(e) => {
                debug!("TLS probe for {} degraded: {}", host, e);
                TlsProbe::Degraded {
                    reason: e.to_string(),
                }
            },
        }
    }

    async fn probe_redirects(&self, url: &str) -> RedirectProbe {
        let max_hops = self.config.max_redirects.min(MAX_REDIRECT_HOPS);
        let mut chain = vec![url.to_string()];

        let (mut status, mut location) = match self.head_status(url).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Redirect probe for {} failed on first request: {}", url, e);
                return RedirectProbe::Failed {
                    reason: e.to_string(),
                };
            },
        };

        // A hop joins the chain only once its own HEAD request has answered
        while is_redirect_status(status) && chain.len() - 1 < max_hops {
            let current = chain.last().cloned().unwrap_or_else(|| url.to_string());

            let next = match location
                .as_deref()
                .ok_or_else(|| ProbeError::InvalidLocation("missing Location header".to_string()))
                .and_then(|loc| resolve_location(&current, loc))
            {
                Ok(next) => next,
                Err(e) => {
                    warn!("Redirect chain from {} truncated: {}", url, e);
                    return RedirectProbe::Truncated {
                        chain,
                        reason: e.to_string(),
                    };
                },
            };

            match self.head_status(&next).await {
                Ok((next_status, next_location)) => {
                    chain.push(next);
                    status = next_status;
                    location = next_location;
                },
                Err(e) => {
                    warn!("Redirect chain from {} truncated at {}: {}", url, next, e);
                    return RedirectProbe::Truncated {
                        chain,
                        reason: format!("{}: {}", next, e),
                    };
                },
            }
        }

        debug!("Redirect probe for {} followed {} hops", url, chain.len() - 1);
        RedirectProbe::Complete { chain }
    }
}

// =============================================================================
// FIXED PROBE
// =============================================================================

/// Probe with predetermined outcomes, for running without network egress
#[derive(Debug, Clone)]
pub struct FixedSiteProbe {
    tls: TlsProbe,
    redirect_hops: Option<Vec<String>>,
}

impl FixedSiteProbe {
    /// Every probe degrades, as if the host were unreachable
    pub fn unreachable() -> Self {
        Self {
            tls: TlsProbe::Degraded {
                reason: "network probes disabled".to_string(),
            },
            redirect_hops: None,
        }
    }

    /// TLS succeeds with the given issuer and the URL does not redirect
    pub fn secure(issuer: &str) -> Self {
        Self {
            tls: TlsProbe::Established {
                issuer: Some(issuer.to_string()),
            },
            redirect_hops: Some(Vec::new()),
        }
    }

    /// Every redirect walk follows `hops` after the input URL
    pub fn with_redirects(mut self, hops: Vec<String>) -> Self {
        self.redirect_hops = Some(hops);
        self
    }
}

#[async_trait]
impl SiteProbe for FixedSiteProbe {
    async fn probe_tls(&self, _host: &str) -> TlsProbe {
        self.tls.clone()
    }

    async fn probe_redirects(&self, url: &str) -> RedirectProbe {
        match &self.redirect_hops {
            Some(hops) => {
                let mut chain = vec![url.to_string()];
                chain.extend(hops.iter().take(MAX_REDIRECT_HOPS).cloned());
                RedirectProbe::Complete { chain }
            },
            None => RedirectProbe::Failed {
                reason: "network probes disabled".to_string(),
            },
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
