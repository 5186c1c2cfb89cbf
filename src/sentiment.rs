use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Magnitude of polarity, in [0, 1].
    pub score: f64,
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Polarity is left of the threshold band for negative, right of it for
/// positive. The band itself, [-0.1, 0.1], is neutral.
const POLARITY_THRESHOLD: f64 = 0.1;

/// A negator preceding a sentiment word flips and dampens its polarity.
const NEGATION_FACTOR: f64 = -0.5;

const NEGATORS: &[&str] = &["not", "no", "never", "cannot", "isnt", "dont", "wont"];

/// (word, polarity in [-1,1], subjectivity in [0,1])
const WORD_SCORES: &[(&str, f64, f64)] = &[
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("wonderful", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("awesome", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("love", 0.5, 0.6),
    ("happy", 0.8, 1.0),
    ("promising", 0.5, 0.7),
    ("successful", 0.45, 0.6),
    ("improved", 0.4, 0.5),
    ("positive", 0.35, 0.55),
    ("safe", 0.5, 0.5),
    ("effective", 0.6, 0.6),
    ("bad", -0.7, 0.67),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("worst", -1.0, 0.3),
    ("hate", -0.8, 0.9),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("disappointed", -0.75, 0.75),
    ("poor", -0.4, 0.6),
    ("dangerous", -0.6, 0.7),
    ("deadly", -0.8, 0.8),
    ("catastrophic", -0.9, 0.9),
    ("fraudulent", -0.7, 0.8),
    ("harmful", -0.6, 0.7),
    ("negative", -0.35, 0.55),
    ("crisis", -0.5, 0.4),
    ("failure", -0.6, 0.5),
];

/// Lexicon-based sentiment analyzer. Pure and infallible: a text with no
/// scored words is neutral with zero polarity and subjectivity.
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> Sentiment {
        let tokens: Vec<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&(_, polarity, subjectivity)) =
                WORD_SCORES.iter().find(|&&(w, _, _)| w == token.as_str())
            else {
                continue;
            };

            let negated = i > 0 && NEGATORS.contains(&tokens[i - 1].as_str());
            let polarity = if negated {
                polarity * NEGATION_FACTOR
            } else {
                polarity
            };

            polarities.push(polarity);
            subjectivities.push(subjectivity);
        }

        let polarity = mean(&polarities);
        let subjectivity = mean(&subjectivities);

        let label = if polarity > POLARITY_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < -POLARITY_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        Sentiment {
            label,
            score: polarity.abs(),
            polarity,
            subjectivity,
        }
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
