use serde::Deserialize;
use std::path::Path;

/// Phrase lists driving the heuristic predictor and the explanation
/// ranker. Ships with a built-in default set; a JSON file given via
/// `--lexicon-path` replaces any of the three lists.
///
/// Matching is substring containment on lowercased text, so every phrase
/// must be stored lowercase. Declaration order is the tie-break order for
/// equal importance scores.
#[derive(Debug, Clone, Deserialize)]
pub struct Lexicon {
    /// Phrases that raise the heuristic fake score.
    #[serde(default = "default_fake_indicators")]
    pub fake_indicators: Vec<String>,

    /// Broader fake-leaning vocabulary, explanation only.
    #[serde(default = "default_fake_keywords")]
    pub fake_keywords: Vec<String>,

    /// Real-leaning vocabulary, explanation only.
    #[serde(default = "default_real_keywords")]
    pub real_keywords: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            fake_indicators: default_fake_indicators(),
            fake_keywords: default_fake_keywords(),
            real_keywords: default_real_keywords(),
        }
    }
}

impl Lexicon {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let lexicon: Lexicon = serde_json::from_str(&raw)?;
        Ok(lexicon)
    }
}

fn default_fake_indicators() -> Vec<String> {
    [
        "shocking",
        "unbelievable",
        "secret",
        "they dont want you to know",
        "doctors hate",
        "one weird trick",
        "breaking",
        "urgent",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_fake_keywords() -> Vec<String> {
    [
        "shocking",
        "unbelievable",
        "secret",
        "exposed",
        "breaking",
        "urgent",
        "doctors hate",
        "one weird trick",
        "you wont believe",
        "conspiracy",
        "government doesnt want",
        "miracle cure",
        "instant",
        "guaranteed",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_real_keywords() -> Vec<String> {
    [
        "according to",
        "research shows",
        "study finds",
        "data indicates",
        "experts say",
        "official",
        "confirmed",
        "investigation",
        "report",
        "published",
        "peer-reviewed",
        "evidence",
        "statistics",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
