// Request and response bodies for the analysis endpoints

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::verdict::Verdict;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

/// One entry of a batch response, either a verdict or the reason it failed
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Analyzed(Box<Verdict>),
    Failed { url: String, error: String },
}

impl BatchItem {
    pub fn is_analyzed(&self) -> bool {
        matches!(self, BatchItem::Analyzed(_))
    }

    pub fn url(&self) -> &str {
        match self {
            BatchItem::Analyzed(verdict) => &verdict.url,
            BatchItem::Failed { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchAnalyzeResponse {
    pub results: Vec<BatchItem>,
    pub total: usize,
}
