use rand::Rng;
use std::sync::Arc;

use crate::lexicon::Lexicon;
use crate::types::{Label, Prediction};

/// Score added for each fake-indicator phrase found in the text.
const INDICATOR_INCREMENT: f64 = 0.15;

/// Upper bound (exclusive) of the random perturbation.
const JITTER_RANGE: f64 = 0.3;

pub const HEURISTIC_VERSION: &str = "mock";

/// Keyword-scoring fallback predictor. Stateless apart from the caller's
/// randomness source, and infallible: every text gets a label.
pub struct HeuristicPredictor {
    lexicon: Arc<Lexicon>,
}

impl HeuristicPredictor {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn predict<R: Rng>(&self, text: &str, rng: &mut R) -> Prediction {
        let text_lower = text.to_lowercase();

        let mut fake_score = 0.0;
        for indicator in &self.lexicon.fake_indicators {
            if text_lower.contains(indicator.as_str()) {
                fake_score += INDICATOR_INCREMENT;
            }
        }

        fake_score += rng.gen_range(0.0..JITTER_RANGE);
        let fake_score = fake_score.clamp(0.0, 1.0);

        let (label, confidence) = if fake_score > 0.5 {
            (Label::Fake, fake_score)
        } else {
            (Label::Real, 1.0 - fake_score)
        };

        Prediction {
            label,
            confidence,
            model_version: HEURISTIC_VERSION.to_string(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ZeroRng;
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn predictor() -> HeuristicPredictor {
        HeuristicPredictor::new(Arc::new(Lexicon::default()))
    }

    #[test]
    fn single_indicator_with_zero_jitter_scores_real_at_085() {
        let prediction = predictor().predict(
            "A shocking development in the city council budget today",
            &mut ZeroRng,
        );
        assert_eq!(prediction.label, Label::Real);
        assert!((prediction.confidence - 0.85).abs() < 1e-9);
        assert_eq!(prediction.model_version, "mock");
    }

    #[test]
    fn many_indicators_score_fake() {
        let text = "BREAKING: urgent secret doctors hate this one weird trick, shocking!";
        let prediction = predictor().predict(text, &mut ZeroRng);
        assert_eq!(prediction.label, Label::Fake);
        assert!(prediction.confidence > 0.5);
        assert!(prediction.confidence <= 1.0);
    }

    #[test]
    fn confidence_is_always_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let predictor = predictor();
        let texts = [
            "",
            "plain report about municipal infrastructure",
            "shocking unbelievable secret breaking urgent doctors hate one weird trick",
        ];
        for text in texts {
            for _ in 0..50 {
                let p = predictor.predict(text, &mut rng);
                assert!((0.0..=1.0).contains(&p.confidence), "text: {text:?}");
                assert!(matches!(p.label, Label::Real | Label::Fake));
            }
        }
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let prediction = predictor().predict("They DONT want you to KNOW this", &mut ZeroRng);
        // "they dont want you to know" matches after lowercasing.
        assert!((prediction.confidence - 0.85).abs() < 1e-9);
    }
}
