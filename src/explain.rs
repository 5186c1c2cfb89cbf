use rand::Rng;
use std::sync::Arc;

use crate::lexicon::Lexicon;

pub const EXPLANATION_METHOD: &str = "keyword-based";
pub const EXPLANATION_NOTE: &str =
    "Keywords extracted based on common fake news indicators and content analysis";

/// Maximum number of keyword entries returned.
const MAX_KEYWORDS: usize = 10;

/// Tokens shorter than this never count as high-frequency context words.
const MIN_CONTEXT_WORD_LEN: usize = 5;

/// How many of the most frequent long tokens are considered.
const TOP_FREQUENT_WORDS: usize = 5;

/// Ranks the keywords that drove (or would drive) a classification:
/// lexicon matches first, then high-frequency long words as context.
/// Independent of the prediction router; pure apart from the injected
/// randomness used for lexicon-match importance.
pub struct ExplanationRanker {
    lexicon: Arc<Lexicon>,
}

impl ExplanationRanker {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn explain<R: Rng>(&self, text: &str, rng: &mut R) -> Vec<(String, f64)> {
        let text_lower = text.to_lowercase();
        let words: Vec<&str> = text_lower.split_whitespace().collect();

        let mut keywords: Vec<(String, f64)> = Vec::new();

        for keyword in &self.lexicon.fake_keywords {
            if text_lower.contains(keyword.as_str()) {
                keywords.push((keyword.clone(), 0.8 + rng.r#gen::<f64>() * 0.2));
            }
        }

        for keyword in &self.lexicon.real_keywords {
            if text_lower.contains(keyword.as_str()) {
                keywords.push((keyword.clone(), 0.6 + rng.r#gen::<f64>() * 0.3));
            }
        }

        // Frequency ties keep first-encountered order; the stable sort
        // below does the rest.
        let mut word_order: Vec<&str> = Vec::new();
        let mut word_freq: Vec<usize> = Vec::new();
        for word in &words {
            if word.chars().count() < MIN_CONTEXT_WORD_LEN {
                continue;
            }
            match word_order.iter().position(|w| w == word) {
                Some(i) => word_freq[i] += 1,
                None => {
                    word_order.push(word);
                    word_freq.push(1);
                }
            }
        }

        let mut indices: Vec<usize> = (0..word_order.len()).collect();
        indices.sort_by(|&a, &b| word_freq[b].cmp(&word_freq[a]));

        for &i in indices.iter().take(TOP_FREQUENT_WORDS) {
            let word = word_order[i];
            let freq = word_freq[i];
            if freq > 1 && !keywords.iter().any(|(k, _)| k == word) {
                let importance = 0.3 + (freq as f64 / words.len() as f64) * 0.4;
                keywords.push((word.to_string(), importance));
            }
        }

        if keywords.is_empty() {
            keywords = fallback_keywords();
        }

        keywords.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        keywords.truncate(MAX_KEYWORDS);
        keywords
    }
}

fn fallback_keywords() -> Vec<(String, f64)> {
    vec![
        ("content".to_string(), 0.4),
        ("analysis".to_string(), 0.3),
        ("text".to_string(), 0.2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::testing::ZeroRng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ranker() -> ExplanationRanker {
        ExplanationRanker::new(Arc::new(Lexicon::default()))
    }

    #[test]
    fn signal_free_text_returns_exactly_the_fallback_triple() {
        let mut rng = StdRng::seed_from_u64(1);
        for text in ["", "the cat sat on the mat", "one two three four"] {
            let keywords = ranker().explain(text, &mut rng);
            assert_eq!(keywords, fallback_keywords(), "text: {text:?}");
        }
    }

    #[test]
    fn never_more_than_ten_entries_sorted_non_increasing() {
        let mut rng = StdRng::seed_from_u64(2);
        let text = "shocking unbelievable secret exposed breaking urgent conspiracy instant \
                    guaranteed according to research shows study finds data indicates experts say \
                    official confirmed investigation report published evidence statistics";
        let keywords = ranker().explain(text, &mut rng);

        assert!(keywords.len() <= 10);
        for pair in keywords.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn fake_matches_outrank_real_matches() {
        let mut rng = StdRng::seed_from_u64(3);
        let keywords = ranker().explain("a shocking claim, according to nobody", &mut rng);

        let shocking = keywords.iter().find(|(k, _)| k == "shocking").unwrap();
        let according = keywords.iter().find(|(k, _)| k == "according to").unwrap();
        assert!((0.8..1.0).contains(&shocking.1));
        assert!((0.6..0.9).contains(&according.1));
    }

    #[test]
    fn repeated_long_words_are_added_as_context() {
        let text = "turbine turbine turbine output rose while turbine maintenance continued";
        let keywords = ranker().explain(text, &mut ZeroRng);

        let turbine = keywords.iter().find(|(k, _)| k == "turbine").unwrap();
        let total = text.split_whitespace().count() as f64;
        let expected = 0.3 + (4.0 / total) * 0.4;
        assert!((turbine.1 - expected).abs() < 1e-9);
        // Long words appearing once are not context keywords.
        assert!(!keywords.iter().any(|(k, _)| k == "output"));
    }

    #[test]
    fn short_and_unrepeated_words_are_ignored() {
        let keywords = ranker().explain("it is so so so so very odd", &mut ZeroRng);
        // "so" repeats but is too short; nothing else qualifies.
        assert_eq!(keywords, fallback_keywords());
    }

    #[test]
    fn lexicon_match_is_not_duplicated_as_context_word() {
        let text = "shocking shocking shocking shocking events unfolded";
        let mut rng = StdRng::seed_from_u64(4);
        let keywords = ranker().explain(text, &mut rng);

        let count = keywords.iter().filter(|(k, _)| k == "shocking").count();
        assert_eq!(count, 1);
    }
}
