use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentLabel;

/// Classification outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Real,
    Fake,
}

/// Uniform result envelope produced by every prediction source.
///
/// `confidence` is always the probability assigned to the returned
/// label, not a raw fake-likelihood score.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: Label,
    pub confidence: f64,
    pub model_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub text: Option<String>,
    #[serde(default)]
    pub use_advanced: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Label,
    pub confidence: f64,
    pub sentiment: SentimentSummary,
    pub timestamp: DateTime<Utc>,
    pub model_version: String,
}

#[derive(Debug, Serialize)]
pub struct SentimentSummary {
    pub label: SentimentLabel,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub sentiment: SentimentDetail,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SentimentDetail {
    pub label: SentimentLabel,
    pub score: f64,
    pub polarity: f64,
    pub subjectivity: f64,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: Explanation,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct Explanation {
    pub keywords: Vec<String>,
    pub importance_scores: Vec<f64>,
    pub method: String,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub url: String,
    pub extracted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub model_loaded: bool,
    pub service: String,
}
