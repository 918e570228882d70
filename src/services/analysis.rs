// Analysis pipeline
// extract -> (score, classify) -> compose, for one URL or an isolated batch

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::analysis::BatchItem;
use crate::models::verdict::Verdict;
use crate::services::classifier::PhishingClassifier;
use crate::services::feature_extractor::FeatureExtractor;
use crate::services::risk_scorer::calculate_risk_score;
use crate::services::verdict::compose;
use crate::utils::analysis_errors::{AnalysisError, AnalysisResult};
use crate::utils::url_validator::normalize_and_validate;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub enabled: bool,
    pub max_size: usize,
    /// Pipeline runs in flight at once within one batch
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: 100,
            concurrency: 8,
        }
    }
}

pub struct AnalysisService {
    extractor: FeatureExtractor,
    classifier: Arc<PhishingClassifier>,
    batch: BatchConfig,
}

impl AnalysisService {
    pub fn new(
        extractor: FeatureExtractor,
        classifier: Arc<PhishingClassifier>,
        batch: BatchConfig,
    ) -> Self {
        Self {
            extractor,
            classifier,
            batch,
        }
    }

    pub fn classifier(&self) -> &Arc<PhishingClassifier> {
        &self.classifier
    }

    pub fn batch_config(&self) -> &BatchConfig {
        &self.batch
    }

    /// Analyze an already normalized http(s) URL
    pub async fn analyze(&self, url: &str) -> AnalysisResult<Verdict> {
        let features = self.extractor.extract(url).await?;
        let risk_score = calculate_risk_score(&features);

        // First use may train the model; keep that off the async workers
        let classifier = Arc::clone(&self.classifier);
        let prediction = if classifier.is_ready() {
            classifier.predict(&features)?
        } else {
            let features = features.clone();
            tokio::task::spawn_blocking(move || classifier.predict(&features))
                .await
                .map_err(|e| {
                    warn!("Classifier task failed: {}", e);
                    AnalysisError::InternalError
                })??
        };

        let verdict = compose(url, &features, prediction, risk_score, Utc::now());
        info!(
            "Analyzed {}: phishing={} confidence={} threat={} risk={}",
            url, verdict.is_phishing, verdict.confidence, verdict.threat_level, verdict.risk_score
        );

        Ok(verdict)
    }

    /// Validate and analyze a raw, user-supplied URL
    pub async fn analyze_input(&self, input: &str) -> AnalysisResult<Verdict> {
        let url = normalize_and_validate(input)?;
        self.analyze(&url).await
    }

    /// Analyze every entry independently, preserving input order.
    /// A failure is reported in place of that entry only.
    pub async fn analyze_batch(&self, inputs: Vec<String>) -> AnalysisResult<Vec<BatchItem>> {
        if !self.batch.enabled {
            return Err(AnalysisError::BatchDisabled);
        }
        if inputs.is_empty() {
            return Err(AnalysisError::EmptyBatch);
        }
        if inputs.len() > self.batch.max_size {
            return Err(AnalysisError::BatchTooLarge {
                size: inputs.len(),
                max: self.batch.max_size,
            });
        }

        let total = inputs.len();
        let results: Vec<BatchItem> = stream::iter(inputs)
            .map(|input| async move {
                match self.analyze_input(&input).await {
                    Ok(verdict) => BatchItem::Analyzed(Box::new(verdict)),
                    Err(e) => {
                        warn!("Batch entry {} failed: {}", input, e);
                        BatchItem::Failed {
                            url: input,
                            error: e.to_string(),
                        }
                    },
                }
            })
            .buffered(self.batch.concurrency.max(1))
            .collect()
            .await;

        let analyzed = results.iter().filter(|item| item.is_analyzed()).count();
        info!("Batch analysis finished: {}/{} analyzed", analyzed, total);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::verdict::ThreatLevel;
    use crate::services::classifier::{ClassifierConfig, ForestParams};
    use crate::services::site_probe::FixedSiteProbe;

    fn service(probe: FixedSiteProbe, batch: BatchConfig) -> AnalysisService {
        let classifier = PhishingClassifier::new(ClassifierConfig {
            model_dir: std::env::temp_dir()
                .join(format!("phishguard-analysis-{}", uuid::Uuid::new_v4())),
            forest: ForestParams {
                n_trees: 15,
                ..ForestParams::default()
            },
        });
        AnalysisService::new(
            FeatureExtractor::new(Arc::new(probe)),
            Arc::new(classifier),
            batch,
        )
    }

    #[tokio::test]
    async fn test_ip_url_verdict() {
        let svc = service(FixedSiteProbe::unreachable(), BatchConfig::default());
        let verdict = svc.analyze_input("http://192.168.1.1").await.unwrap();

        assert_eq!(verdict.url, "http://192.168.1.1/");
        assert!(verdict.flags.contains(&"IP-based URL".to_string()));
        assert!(verdict
            .explanation
            .risk_factors
            .contains(&"Domain is an IP address instead of a proper domain name".to_string()));
        assert!((0.0..=1.0).contains(&verdict.risk_score));
        assert!((0.0..=100.0).contains(&verdict.confidence));
        if !verdict.is_phishing {
            assert_eq!(verdict.threat_level, ThreatLevel::Low);
        }

        let _ = std::fs::remove_dir_all(&svc.classifier().config().model_dir);
    }

    #[tokio::test]
    async fn test_scheme_is_normalized_before_analysis() {
        let svc = service(FixedSiteProbe::secure("CN=Test CA"), BatchConfig::default());
        let verdict = svc.analyze_input("google.com").await.unwrap();
        assert!(verdict.url.starts_with("https://"));

        let _ = std::fs::remove_dir_all(&svc.classifier().config().model_dir);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let svc = service(FixedSiteProbe::unreachable(), BatchConfig::default());
        assert!(matches!(
            svc.analyze_input("").await,
            Err(AnalysisError::InvalidUrl(_))
        ));
        assert!(!svc.classifier().is_ready());
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let svc = service(FixedSiteProbe::unreachable(), BatchConfig::default());
        let results = svc
            .analyze_batch(vec![
                "https://google.com".to_string(),
                "not a url".to_string(),
                "https://github.com".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_analyzed());
        assert!(!results[1].is_analyzed());
        assert_eq!(results[1].url(), "not a url");
        assert!(results[2].is_analyzed());
        assert_eq!(results[2].url(), "https://github.com/");

        let _ = std::fs::remove_dir_all(&svc.classifier().config().model_dir);
    }

    #[tokio::test]
    async fn test_batch_limits() {
        let svc = service(
            FixedSiteProbe::unreachable(),
            BatchConfig {
                enabled: true,
                max_size: 2,
                concurrency: 2,
            },
        );
        assert!(matches!(
            svc.analyze_batch(Vec::new()).await,
            Err(AnalysisError::EmptyBatch)
        ));
        assert!(matches!(
            svc.analyze_batch(vec!["a.com".into(), "b.com".into(), "c.com".into()])
                .await,
            Err(AnalysisError::BatchTooLarge { size: 3, max: 2 })
        ));

        let disabled = service(
            FixedSiteProbe::unreachable(),
            BatchConfig {
                enabled: false,
                ..BatchConfig::default()
            },
        );
        assert!(matches!(
            disabled.analyze_batch(vec!["a.com".into()]).await,
            Err(AnalysisError::BatchDisabled)
        ));
    }
}
