// Verdict composition: threat level, explanation, flags and recommendations

use chrono::{DateTime, Utc};

use crate::models::features::FeatureSet;
use crate::models::verdict::{Explanation, Prediction, ThreatLevel, Verdict};

pub const FLAG_IP_URL: &str = "IP-based URL";
pub const FLAG_HYPHEN: &str = "Hyphenated domain";
pub const FLAG_SUBDOMAINS: &str = "Multiple subdomains";
pub const FLAG_NO_TLS: &str = "No SSL certificate";
pub const FLAG_REDIRECTS: &str = "Suspicious redirects";
pub const FLAG_SPECIAL_CHARS: &str = "Special characters in URL path";

const PHISHING_RECOMMENDATIONS: [&str; 4] = [
    "Do not enter any personal or financial information",
    "Report this URL to your email provider or IT security team",
    "Delete any emails containing this link",
    "Do not download or open any attachments from this source",
];

const HYGIENE_RECOMMENDATIONS: [&str; 2] = [
    "Always verify the sender of unexpected emails before clicking links",
    "Keep your browser and security software up to date",
];

const NO_TLS_RECOMMENDATION: &str = "Avoid entering sensitive information on this website";
const REDIRECT_RECOMMENDATION: &str =
    "Be cautious when clicking this link - it may redirect to malicious content";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Only a phishing label can raise the level above LOW
pub fn threat_level(is_phishing: bool, confidence: f64) -> ThreatLevel {
    if !is_phishing {
        return ThreatLevel::Low;
    }
    if confidence >= 0.95 {
        ThreatLevel::Critical
    } else if confidence >= 0.80 {
        ThreatLevel::High
    } else if confidence >= 0.60 {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    }
}

pub fn explanation(features: &FeatureSet, prediction: Prediction) -> Explanation {
    let mut risk_factors = Vec::new();
    let mut safe_factors = Vec::new();

    if features.is_ip_literal {
        risk_factors.push("Domain is an IP address instead of a proper domain name".to_string());
    }
    if features.has_hyphen {
        risk_factors.push("Domain contains hyphens (common in phishing)".to_string());
    }
    if features.subdomain_count > 3 {
        risk_factors.push("Excessive subdomains detected".to_string());
    }
    if !features.has_tls {
        risk_factors.push("No valid SSL certificate found".to_string());
    }
    if features.has_redirects {
        risk_factors.push(format!(
            "Multiple redirects detected ({} redirects)",
            features.redirect_count
        ));
    }
    if features.domain_length > 40 {
        risk_factors.push("Unusually long domain name".to_string());
    }

    if features.has_tls {
        safe_factors.push("Valid SSL certificate detected".to_string());
    }
    if features.domain_length < 20 {
        safe_factors.push("Domain name length is normal".to_string());
    }
    if !features.has_redirects {
        safe_factors.push("No suspicious redirects detected".to_string());
    }

    let label = if prediction.is_phishing {
        "phishing"
    } else {
        "legitimate"
    };

    Explanation {
        risk_factors,
        safe_factors,
        confidence: prediction.confidence,
        summary: format!(
            "This URL appears to be {} with {:.1}% confidence.",
            label,
            prediction.confidence * 100.0
        ),
    }
}

pub fn flags(features: &FeatureSet) -> Vec<String> {
    let checks = [
        (features.is_ip_literal, FLAG_IP_URL),
        (features.has_hyphen, FLAG_HYPHEN),
        (features.subdomain_count > 3, FLAG_SUBDOMAINS),
        (!features.has_tls, FLAG_NO_TLS),
        (features.has_redirects, FLAG_REDIRECTS),
        (features.special_chars_in_path > 0, FLAG_SPECIAL_CHARS),
    ];

    checks
        .iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, flag)| flag.to_string())
        .collect()
}

pub fn recommendations(is_phishing: bool, flags: &[String]) -> Vec<String> {
    let base: &[&str] = if is_phishing {
        &PHISHING_RECOMMENDATIONS
    } else {
        &HYGIENE_RECOMMENDATIONS
    };
    let mut recommendations: Vec<String> = base.iter().map(|r| r.to_string()).collect();

    if flags.iter().any(|f| f == FLAG_NO_TLS) {
        recommendations.push(NO_TLS_RECOMMENDATION.to_string());
    }
    if flags.iter().any(|f| f == FLAG_REDIRECTS) {
        recommendations.push(REDIRECT_RECOMMENDATION.to_string());
    }

    recommendations
}

/// Pure: the same inputs always give the same verdict
pub fn compose(
    url: &str,
    features: &FeatureSet,
    prediction: Prediction,
    risk_score: f64,
    timestamp: DateTime<Utc>,
) -> Verdict {
    let level = threat_level(prediction.is_phishing, prediction.confidence);
    let triggered = flags(features);
    let advice = recommendations(prediction.is_phishing, &triggered);

    Verdict {
        url: url.to_string(),
        is_phishing: prediction.is_phishing,
        confidence: round2(prediction.confidence * 100.0),
        threat_level: level,
        threat_description: level.description().to_string(),
        risk_score: round2(risk_score),
        explanation: explanation(features, prediction),
        timestamp,
        flags: triggered,
        recommendations: advice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::features::{DomainShape, RedirectProbe, TlsProbe};

    fn ip_features() -> FeatureSet {
        let url = "http://192.168.1.1/login@portal";
        FeatureSet::assemble(
            url,
            DomainShape::parse(url).unwrap(),
            TlsProbe::Degraded {
                reason: "connection refused".to_string(),
            },
            RedirectProbe::Complete {
                chain: vec![url.to_string(), "http://evil.example/".to_string()],
            },
            false,
        )
    }

    fn clean_features() -> FeatureSet {
        let url = "https://example.com/";
        FeatureSet::assemble(
            url,
            DomainShape::parse(url).unwrap(),
            TlsProbe::Established { issuer: None },
            RedirectProbe::Complete {
                chain: vec![url.to_string()],
            },
            false,
        )
    }

    #[test]
    fn test_threat_level_boundaries() {
        assert_eq!(threat_level(true, 0.95), ThreatLevel::Critical);
        assert_eq!(threat_level(true, 0.9499), ThreatLevel::High);
        assert_eq!(threat_level(true, 0.80), ThreatLevel::High);
        assert_eq!(threat_level(true, 0.7999), ThreatLevel::Medium);
        assert_eq!(threat_level(true, 0.60), ThreatLevel::Medium);
        assert_eq!(threat_level(true, 0.5999), ThreatLevel::Low);
    }

    #[test]
    fn test_not_phishing_is_always_low() {
        for confidence in [0.0, 0.5, 0.61, 0.85, 0.95, 1.0] {
            assert_eq!(threat_level(false, confidence), ThreatLevel::Low);
        }
    }

    #[test]
    fn test_ip_url_factors_and_flags() {
        let features = ip_features();
        let explanation = explanation(
            &features,
            Prediction {
                is_phishing: true,
                confidence: 0.97,
            },
        );

        assert!(explanation
            .risk_factors
            .contains(&"Domain is an IP address instead of a proper domain name".to_string()));
        assert!(explanation
            .risk_factors
            .contains(&"Multiple redirects detected (1 redirects)".to_string()));
        assert!(explanation
            .safe_factors
            .contains(&"Domain name length is normal".to_string()));
        assert_eq!(
            explanation.summary,
            "This URL appears to be phishing with 97.0% confidence."
        );

        assert_eq!(
            flags(&features),
            vec![
                FLAG_IP_URL.to_string(),
                FLAG_NO_TLS.to_string(),
                FLAG_REDIRECTS.to_string(),
                FLAG_SPECIAL_CHARS.to_string(),
            ]
        );
    }

    #[test]
    fn test_recommendations() {
        let phishing = recommendations(true, &[]);
        assert_eq!(phishing.len(), 4);

        let safe = recommendations(false, &[]);
        assert_eq!(safe.len(), 2);

        let with_extras = recommendations(
            false,
            &[FLAG_NO_TLS.to_string(), FLAG_REDIRECTS.to_string()],
        );
        assert_eq!(with_extras.len(), 4);
        assert_eq!(with_extras[2], NO_TLS_RECOMMENDATION);
        assert_eq!(with_extras[3], REDIRECT_RECOMMENDATION);
    }

    #[test]
    fn test_compose_scales_and_rounds() {
        let now = Utc::now();
        let verdict = compose(
            "http://192.168.1.1/login@portal",
            &ip_features(),
            Prediction {
                is_phishing: true,
                confidence: 0.95,
            },
            0.4512,
            now,
        );

        assert_eq!(verdict.confidence, 95.0);
        assert_eq!(verdict.threat_level, ThreatLevel::Critical);
        assert_eq!(verdict.threat_description, ThreatLevel::Critical.description());
        assert_eq!(verdict.risk_score, 0.45);
        assert_eq!(verdict.explanation.confidence, 0.95);
        assert_eq!(verdict.timestamp, now);
        assert_eq!(verdict.recommendations.len(), 6);
    }

    #[test]
    fn test_compose_clean_site() {
        let now = Utc::now();
        let verdict = compose(
            "https://example.com/",
            &clean_features(),
            Prediction {
                is_phishing: false,
                confidence: 0.9,
            },
            0.0,
            now,
        );

        assert!(!verdict.is_phishing);
        assert_eq!(verdict.threat_level, ThreatLevel::Low);
        assert!(verdict.flags.is_empty());
        assert!(verdict.explanation.risk_factors.is_empty());
        assert_eq!(verdict.explanation.safe_factors.len(), 3);
        assert_eq!(verdict.recommendations.len(), 2);

        // Deterministic for identical inputs
        let again = compose(
            "https://example.com/",
            &clean_features(),
            Prediction {
                is_phishing: false,
                confidence: 0.9,
            },
            0.0,
            now,
        );
        assert_eq!(verdict, again);
    }
}
