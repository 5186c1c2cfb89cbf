use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::PredictionError;
use crate::types::{Label, Prediction};

/// Maximum number of input characters embedded into the prompt.
const PROMPT_TEXT_LIMIT: usize = 4000;

/// Seam between the router and the hosted generative model, so advanced
/// mode can be exercised without network access.
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Prediction, PredictionError>;
}

/// Client for a Gemini-style generateContent endpoint. One bounded
/// attempt per request; the configured timeout applies to the whole call.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl RemoteClassifier for GeminiClient {
    #[tracing::instrument(skip(self, text), fields(model = %self.model))]
    async fn classify(&self, text: &str) -> Result<Prediction, PredictionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = serde_json::json!({
            "contents": [{"parts": [{"text": build_prompt(text)}]}],
            "generationConfig": {"temperature": 0.1, "maxOutputTokens": 256}
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PredictionError::RemoteFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "remote classification rejected");
            return Err(PredictionError::RemoteFailure(format!("HTTP {status}")));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PredictionError::RemoteFailure(e.to_string()))?;

        let content = data
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| PredictionError::RemoteFailure("missing content".to_string()))?;

        let (label, confidence) = parse_verdict(&content)?;

        Ok(Prediction {
            label,
            confidence,
            model_version: self.model.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub fn build_prompt(text: &str) -> String {
    let snippet = truncate_chars(text, PROMPT_TEXT_LIMIT);
    format!(
        r#"You are a fact-checking assistant. Classify the following news text as "real" or "fake".

Guidance:
- Satire or parody is fake, even when clearly labelled.
- A clickbait headline over a factually accurate body is real.
- Opinion or editorial pieces from reputable sources are real.

Respond with a single JSON object and nothing else:
{{"prediction": "real" or "fake", "confidence": a number between 0 and 1}}

Text:
{snippet}"#
    )
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Strict wire format for the remote verdict: exactly these two fields.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Verdict {
    prediction: String,
    confidence: f64,
}

/// Parse the remote model's reply into a label and confidence. The reply
/// may be wrapped in a triple-backtick fence (optionally tagged "json").
/// Anything else, including an out-of-range confidence, is a
/// `RemoteFailure` rather than a guessed result.
pub fn parse_verdict(raw: &str) -> Result<(Label, f64), PredictionError> {
    let trimmed = raw.trim();
    let payload = unwrap_code_fence(trimmed).unwrap_or(trimmed);

    let verdict: Verdict = serde_json::from_str(payload)
        .map_err(|e| PredictionError::RemoteFailure(format!("malformed verdict: {e}")))?;

    let label = match verdict.prediction.to_lowercase().as_str() {
        "real" => Label::Real,
        "fake" => Label::Fake,
        other => {
            return Err(PredictionError::RemoteFailure(format!(
                "unknown prediction label {other:?}"
            )));
        }
    };

    if !(0.0..=1.0).contains(&verdict.confidence) {
        return Err(PredictionError::RemoteFailure(format!(
            "confidence {} outside [0, 1]",
            verdict.confidence
        )));
    }

    Ok((label, verdict.confidence))
}

/// Strip a surrounding ``` fence. Returns `None` when the input is not
/// fenced, so the caller falls back to the raw text.
pub fn unwrap_code_fence(text: &str) -> Option<&str> {
    let inner = text
        .trim()
        .strip_prefix("```")?
        .strip_suffix("```")?
        .trim_start_matches("json");
    Some(inner.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfenced_text_is_left_alone() {
        assert_eq!(unwrap_code_fence(r#"{"a": 1}"#), None);
    }

    #[test]
    fn plain_fence_is_unwrapped() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(unwrap_code_fence(raw), Some("{\"a\": 1}"));
    }

    #[test]
    fn json_tagged_fence_is_unwrapped() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(unwrap_code_fence(raw), Some("{\"a\": 1}"));
    }

    #[test]
    fn verdict_parses_with_and_without_fence() {
        let plain = r#"{"prediction": "fake", "confidence": 0.92}"#;
        assert_eq!(parse_verdict(plain).unwrap(), (Label::Fake, 0.92));

        let fenced = "```json\n{\"prediction\": \"real\", \"confidence\": 0.7}\n```";
        assert_eq!(parse_verdict(fenced).unwrap(), (Label::Real, 0.7));
    }

    #[test]
    fn verdict_labels_are_case_insensitive() {
        let raw = r#"{"prediction": "FAKE", "confidence": 0.5}"#;
        assert_eq!(parse_verdict(raw).unwrap(), (Label::Fake, 0.5));
    }

    #[test]
    fn missing_field_is_a_remote_failure() {
        let raw = r#"{"prediction": "fake"}"#;
        assert!(matches!(
            parse_verdict(raw),
            Err(PredictionError::RemoteFailure(_))
        ));
    }

    #[test]
    fn extra_fields_are_a_remote_failure() {
        let raw = r#"{"prediction": "fake", "confidence": 0.5, "reasoning": "vibes"}"#;
        assert!(matches!(
            parse_verdict(raw),
            Err(PredictionError::RemoteFailure(_))
        ));
    }

    #[test]
    fn unknown_label_is_a_remote_failure() {
        let raw = r#"{"prediction": "maybe", "confidence": 0.5}"#;
        assert!(matches!(
            parse_verdict(raw),
            Err(PredictionError::RemoteFailure(_))
        ));
    }

    #[test]
    fn out_of_range_confidence_is_rejected_not_clamped() {
        let raw = r#"{"prediction": "fake", "confidence": 1.4}"#;
        assert!(matches!(
            parse_verdict(raw),
            Err(PredictionError::RemoteFailure(_))
        ));
    }

    #[test]
    fn prompt_embeds_at_most_4000_characters() {
        // Marker character must not occur in the prompt template itself.
        let text = "ø".repeat(10_000);
        let prompt = build_prompt(&text);
        let embedded = prompt.matches('ø').count();
        assert_eq!(embedded, 4000);
    }

    #[test]
    fn prompt_truncation_respects_char_boundaries() {
        let text = "é".repeat(5000);
        let prompt = build_prompt(&text);
        assert_eq!(prompt.matches('é').count(), 4000);
    }
}
