// Rule-based risk score, independent of the classifier

use crate::models::features::FeatureSet;

const MAX_SCORE: f64 = 10.0;

/// Weighted rule table; every triggered condition adds its weight
pub fn calculate_risk_score(features: &FeatureSet) -> f64 {
    let mut score = 0.0;

    if features.is_ip_literal {
        score += 2.5;
    }
    if features.has_hyphen {
        score += 1.0;
    }
    if !features.has_tls {
        score += 2.0;
    }
    if features.subdomain_count > 3 {
        score += 1.5;
    }
    if features.redirect_count > 2 {
        score += 2.0;
    }
    if features.domain_length > 40 {
        score += 1.0;
    }
    if features.special_chars_in_path > 3 {
        score += 1.5;
    }

    (score / MAX_SCORE).min(1.0)
}
