pub mod analysis;
pub mod features;
pub mod verdict;

// Re-export common types
pub use analysis::{AnalyzeRequest, BatchAnalyzeResponse, BatchItem};
pub use features::{DomainShape, FeatureSet, RedirectProbe, TlsProbe};
pub use verdict::{Explanation, Prediction, ThreatLevel, Verdict};
