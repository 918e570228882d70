// Verdict model returned for every analyzed URL

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classifier output consumed by the verdict composer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub is_phishing: bool,
    /// Fraction of trees agreeing with the chosen label, 0.0-1.0
    pub confidence: f64,
}

impl Prediction {
    /// Neutral answer used when the feature vector cannot be built
    pub fn neutral() -> Self {
        Self {
            is_phishing: false,
            confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn description(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "Minimal risk. URL appears safe.",
            ThreatLevel::Medium => "Moderate risk detected. Review URL carefully.",
            ThreatLevel::High => "Significant risk indicators. Likely phishing attempt.",
            ThreatLevel::Critical => "Extreme risk. Highly likely to be phishing. Do not interact.",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatLevel::Low => write!(f, "LOW"),
            ThreatLevel::Medium => write!(f, "MEDIUM"),
            ThreatLevel::High => write!(f, "HIGH"),
            ThreatLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub risk_factors: Vec<String>,
    pub safe_factors: Vec<String>,
    /// Raw classifier confidence, 0.0-1.0
    pub confidence: f64,
    pub summary: String,
}

/// Full phishing-risk report for one URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub url: String,
    pub is_phishing: bool,
    /// 0-100, two decimals
    pub confidence: f64,
    pub threat_level: ThreatLevel,
    pub threat_description: String,
    /// 0-1, two decimals
    pub risk_score: f64,
    pub explanation: Explanation,
    pub timestamp: DateTime<Utc>,
    pub flags: Vec<String>,
    pub recommendations: Vec<String>,
}
