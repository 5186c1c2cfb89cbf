use rand::Rng;
use std::sync::Arc;

use crate::error::PredictionError;
use crate::heuristic::HeuristicPredictor;
use crate::model::TextClassifier;
use crate::remote::RemoteClassifier;
use crate::types::Prediction;

/// Dispatches each request to exactly one prediction source family.
///
/// Standard mode tries the local classifier and falls back to the
/// heuristic when the artifact is absent or inference fails; the
/// fallback cannot fail. Advanced mode uses the remote classifier only
/// and surfaces its failures, by design: advanced mode is an explicit
/// opt-in and must not silently degrade to a cheaper model. One attempt
/// per source, no retries, sources never mixed.
pub struct PredictionRouter {
    classifier: Option<Arc<dyn TextClassifier>>,
    heuristic: HeuristicPredictor,
    remote: Option<Arc<dyn RemoteClassifier>>,
}

impl PredictionRouter {
    pub fn new(
        classifier: Option<Arc<dyn TextClassifier>>,
        heuristic: HeuristicPredictor,
        remote: Option<Arc<dyn RemoteClassifier>>,
    ) -> Self {
        Self {
            classifier,
            heuristic,
            remote,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    #[tracing::instrument(skip(self, text, rng))]
    pub async fn predict<R: Rng>(
        &self,
        text: &str,
        advanced: bool,
        rng: &mut R,
    ) -> Result<Prediction, PredictionError> {
        if advanced {
            return match &self.remote {
                Some(remote) => remote.classify(text).await,
                None => Err(PredictionError::Unconfigured),
            };
        }

        if let Some(classifier) = &self.classifier {
            match classifier.predict(text) {
                Ok(prediction) => return Ok(prediction),
                Err(err) => {
                    tracing::warn!(error = %err, "local inference failed, falling back to heuristic");
                }
            }
        }

        Ok(self.heuristic.predict(text, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::testing::ZeroRng;
    use crate::lexicon::Lexicon;
    use crate::types::Label;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingClassifier;

    impl TextClassifier for FailingClassifier {
        fn predict(&self, _text: &str) -> Result<Prediction, PredictionError> {
            Err(PredictionError::ModelFailure("shape mismatch".into()))
        }
    }

    struct CountingClassifier {
        calls: AtomicUsize,
    }

    impl TextClassifier for CountingClassifier {
        fn predict(&self, _text: &str) -> Result<Prediction, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Prediction {
                label: Label::Real,
                confidence: 0.9,
                model_version: "v1.0".into(),
            })
        }
    }

    struct StubRemote {
        result: Result<Prediction, PredictionError>,
    }

    #[async_trait]
    impl RemoteClassifier for StubRemote {
        async fn classify(&self, _text: &str) -> Result<Prediction, PredictionError> {
            match &self.result {
                Ok(p) => Ok(p.clone()),
                Err(PredictionError::RemoteFailure(e)) => {
                    Err(PredictionError::RemoteFailure(e.clone()))
                }
                Err(_) => Err(PredictionError::Unconfigured),
            }
        }
    }

    fn heuristic() -> HeuristicPredictor {
        HeuristicPredictor::new(Arc::new(Lexicon::default()))
    }

    #[tokio::test]
    async fn failing_classifier_falls_back_to_heuristic() {
        let router = PredictionRouter::new(Some(Arc::new(FailingClassifier)), heuristic(), None);

        let prediction = router
            .predict("a perfectly ordinary report", false, &mut ZeroRng)
            .await
            .unwrap();
        assert_eq!(prediction.model_version, "mock");
    }

    #[tokio::test]
    async fn working_classifier_reports_model_version() {
        let classifier = Arc::new(CountingClassifier {
            calls: AtomicUsize::new(0),
        });
        let router = PredictionRouter::new(Some(classifier.clone()), heuristic(), None);

        let prediction = router
            .predict("a perfectly ordinary report", false, &mut ZeroRng)
            .await
            .unwrap();
        assert_eq!(prediction.model_version, "v1.0");
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_artifact_uses_heuristic() {
        let router = PredictionRouter::new(None, heuristic(), None);
        let prediction = router
            .predict("a perfectly ordinary report", false, &mut ZeroRng)
            .await
            .unwrap();
        assert_eq!(prediction.model_version, "mock");
    }

    #[tokio::test]
    async fn advanced_without_credential_is_unconfigured() {
        let router = PredictionRouter::new(Some(Arc::new(FailingClassifier)), heuristic(), None);
        let result = router
            .predict("a perfectly ordinary report", true, &mut ZeroRng)
            .await;
        assert!(matches!(result, Err(PredictionError::Unconfigured)));
    }

    #[tokio::test]
    async fn advanced_failure_never_falls_back_to_local() {
        let classifier = Arc::new(CountingClassifier {
            calls: AtomicUsize::new(0),
        });
        let remote = Arc::new(StubRemote {
            result: Err(PredictionError::RemoteFailure("timeout".into())),
        });
        let router = PredictionRouter::new(Some(classifier.clone()), heuristic(), Some(remote));

        let result = router
            .predict("a perfectly ordinary report", true, &mut ZeroRng)
            .await;
        assert!(matches!(result, Err(PredictionError::RemoteFailure(_))));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn advanced_success_uses_remote_result_verbatim() {
        let remote = Arc::new(StubRemote {
            result: Ok(Prediction {
                label: Label::Fake,
                confidence: 0.88,
                model_version: "gemini-1.5-flash".into(),
            }),
        });
        let router = PredictionRouter::new(None, heuristic(), Some(remote));

        let prediction = router
            .predict("a perfectly ordinary report", true, &mut ZeroRng)
            .await
            .unwrap();
        assert_eq!(prediction.label, Label::Fake);
        assert_eq!(prediction.model_version, "gemini-1.5-flash");
    }
}
