// Fixed-order numeric layout of a FeatureSet for the classifier

use thiserror::Error;

use crate::models::features::FeatureSet;

/// Vector layout the bootstrap model is trained with
pub const FEATURE_NAMES: [&str; 11] = [
    "has_tls",
    "subdomain_count",
    "has_hyphen",
    "domain_length",
    "is_ip_literal",
    "has_digits",
    "path_length",
    "has_query",
    "special_chars_in_path",
    "has_redirects",
    "redirect_count",
];

pub fn default_feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|name| name.to_string()).collect()
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    #[error("Unknown feature in model layout: {0}")]
    UnknownFeature(String),

    #[error("Feature vector has {actual} values, model expects {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Feature {0} is not a finite number")]
    NonFinite(String),
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Numeric value of a named feature, booleans coerced to 0/1
pub fn feature_value(features: &FeatureSet, name: &str) -> Option<f64> {
    let value = match name {
        "has_tls" => flag(features.has_tls),
        "subdomain_count" => features.subdomain_count as f64,
        "has_hyphen" => flag(features.has_hyphen),
        "domain_length" => features.domain_length as f64,
        "is_ip_literal" => flag(features.is_ip_literal),
        "has_digits" => flag(features.has_digits),
        "path_length" => features.path_length as f64,
        "has_query" => flag(features.has_query),
        "special_chars_in_path" => features.special_chars_in_path as f64,
        "has_redirects" => flag(features.has_redirects),
        "redirect_count" => features.redirect_count as f64,
        _ => return None,
    };
    Some(value)
}

/// Build the vector in the order given by `layout`
pub fn build_feature_vector(
    features: &FeatureSet,
    layout: &[String],
) -> Result<Vec<f64>, VectorError> {
    layout
        .iter()
        .map(|name| {
            let value = feature_value(features, name)
                .ok_or_else(|| VectorError::UnknownFeature(name.clone()))?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(VectorError::NonFinite(name.clone()))
            }
        })
        .collect()
}
