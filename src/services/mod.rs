// Services module for PhishGuard Backend
// Business logic layer: extraction, scoring, classification and verdicts

pub mod analysis;
pub mod classifier;
pub mod feature_extractor;
pub mod risk_scorer;
pub mod site_probe;
pub mod verdict;

// Re-export commonly used services
pub use analysis::{AnalysisService, BatchConfig};
pub use classifier::{
    ClassifierConfig, ClassifierError, ClassifierStatus, ForestParams, PhishingClassifier,
};
pub use feature_extractor::{check_domain_age, ExtractionError, FeatureExtractor};
pub use risk_scorer::calculate_risk_score;
pub use site_probe::{FixedSiteProbe, LiveSiteProbe, ProbeConfig, ProbeError, SiteProbe};
pub use verdict::compose;
