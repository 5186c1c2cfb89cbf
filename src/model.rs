use anyhow::{Result, bail};
use candle_core::{Device, Tensor};
use candle_nn::ops::softmax;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::PredictionError;
use crate::types::{Label, Prediction};

pub const MODEL_VERSION: &str = "v1.0";

/// Seam between the router and the local inference path, so the fallback
/// policy can be exercised against failing stand-ins.
pub trait TextClassifier: Send + Sync {
    fn predict(&self, text: &str) -> Result<Prediction, PredictionError>;
}

/// Fitted TF-IDF vectorizer: vocabulary, per-term idf weights and the
/// n-gram range it was fitted with. Loaded from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f32>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl TfidfVectorizer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let vectorizer: TfidfVectorizer = serde_json::from_str(&raw)?;
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    fn validate(&self) -> Result<()> {
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            bail!("invalid ngram range ({lo}, {hi})");
        }
        for (term, &index) in &self.vocabulary {
            if index >= self.idf.len() {
                bail!(
                    "vocabulary index {index} for {term:?} out of idf range {}",
                    self.idf.len()
                );
            }
        }
        Ok(())
    }

    /// Transform text into an L2-normalized tf-idf feature vector.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut features = vec![0.0f32; self.idf.len()];

        let (lo, hi) = self.ngram_range;
        for n in lo..=hi {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&term) {
                    features[index] += self.idf[index];
                }
            }
        }

        let norm = features.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }
        features
    }
}

/// The trained classifier and its fitted vectorizer, loaded once at
/// startup and shared immutably across requests. Absence is a valid
/// steady state handled by the router, not a fatal error.
pub struct ModelArtifact {
    vectorizer: TfidfVectorizer,
    weight: Tensor,
    bias: Tensor,
    device: Device,
}

impl ModelArtifact {
    pub fn load(model_path: &Path, vectorizer_path: &Path) -> Result<Self> {
        let device = Device::Cpu;
        let vectorizer = TfidfVectorizer::from_file(vectorizer_path)?;

        let tensors = candle_core::safetensors::load(model_path, &device)?;
        let weight = tensors
            .get("weight")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("classifier weights missing \"weight\" tensor"))?;
        let bias = tensors
            .get("bias")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("classifier weights missing \"bias\" tensor"))?;

        let artifact = Self {
            vectorizer,
            weight,
            bias,
            device,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn from_parts(vectorizer: TfidfVectorizer, weight: Tensor, bias: Tensor) -> Result<Self> {
        let artifact = Self {
            vectorizer,
            weight,
            bias,
            device: Device::Cpu,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<()> {
        let (classes, features) = self.weight.dims2()?;
        if classes != 2 {
            bail!("expected a two-class weight matrix, got {classes} rows");
        }
        if features != self.vectorizer.idf.len() {
            bail!(
                "weight matrix has {features} columns but the vectorizer produces {} features",
                self.vectorizer.idf.len()
            );
        }
        if self.bias.dims1()? != 2 {
            bail!("expected a two-class bias vector");
        }
        Ok(())
    }

    fn class_probabilities(&self, text: &str) -> candle_core::Result<Vec<f32>> {
        let features = self.vectorizer.transform(text);
        let input = Tensor::from_vec(features, (1, self.vectorizer.idf.len()), &self.device)?;
        let logits = input.matmul(&self.weight.t()?)?.broadcast_add(&self.bias)?;
        let probs = softmax(&logits, 1)?.to_vec2::<f32>()?;
        Ok(probs.into_iter().next().unwrap_or_default())
    }
}

impl TextClassifier for ModelArtifact {
    /// Class index 1 is fake, 0 is real; confidence is the winning-class
    /// probability. Any tensor failure is a recoverable `ModelFailure`.
    fn predict(&self, text: &str) -> Result<Prediction, PredictionError> {
        let probs = self
            .class_probabilities(text)
            .map_err(|e| PredictionError::ModelFailure(e.to_string()))?;
        if probs.len() != 2 {
            return Err(PredictionError::ModelFailure(format!(
                "expected two class probabilities, got {}",
                probs.len()
            )));
        }

        let (label, confidence) = if probs[1] > probs[0] {
            (Label::Fake, probs[1] as f64)
        } else {
            (Label::Real, probs[0] as f64)
        };

        Ok(Prediction {
            label,
            confidence,
            model_version: MODEL_VERSION.to_string(),
        })
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}
