mod config;
mod error;
mod explain;
mod extract;
mod heuristic;
mod lexicon;
mod model;
mod remote;
mod router;
mod sentiment;
mod types;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use clap::Parser;
use metrics::counter;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use url::Url;

use config::Config;
use error::ApiError;
use explain::{EXPLANATION_METHOD, EXPLANATION_NOTE, ExplanationRanker};
use extract::ArticleExtractor;
use heuristic::HeuristicPredictor;
use lexicon::Lexicon;
use model::{ModelArtifact, TextClassifier};
use remote::{GeminiClient, RemoteClassifier};
use router::PredictionRouter;
use sentiment::SentimentAnalyzer;
use types::{
    Explanation, ExplainResponse, ExtractRequest, ExtractResponse, HealthResponse, PredictRequest,
    PredictResponse, SentimentDetail, SentimentResponse, SentimentSummary, TextRequest,
};

const SERVICE_NAME: &str = "AI Fake News Detection API";

/// Minimum trimmed text length for prediction and explanation.
const MIN_PREDICT_LEN: usize = 10;

/// Minimum trimmed text length for sentiment analysis.
const MIN_SENTIMENT_LEN: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,newscheck=debug".into()),
        )
        .init();

    let config = Config::parse();
    tracing::info!(
        address = %config.server_address(),
        model_path = ?config.model_path,
        remote_configured = config.gemini_api_key.is_some(),
        "Starting fake news detection server"
    );

    let lexicon = match &config.lexicon_path {
        Some(path) => Arc::new(Lexicon::from_file(path)?),
        None => Arc::new(Lexicon::default()),
    };

    let classifier: Option<Arc<dyn TextClassifier>> =
        match (&config.model_path, &config.vectorizer_path) {
            (Some(model_path), Some(vectorizer_path)) => {
                match ModelArtifact::load(model_path, vectorizer_path) {
                    Ok(artifact) => {
                        tracing::info!("Model and vectorizer loaded successfully");
                        Some(Arc::new(artifact))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not load model, using mock predictions");
                        None
                    }
                }
            }
            _ => {
                tracing::warn!("Model paths not configured, using mock predictions");
                None
            }
        };

    let remote: Option<Arc<dyn RemoteClassifier>> = match &config.gemini_api_key {
        Some(key) => {
            let client = GeminiClient::new(
                &config.gemini_api_url,
                key,
                &config.gemini_model,
                config.remote_timeout(),
            )?;
            tracing::info!(model = %config.gemini_model, "Remote classifier configured");
            Some(Arc::new(client))
        }
        None => {
            tracing::info!("No remote credential configured, advanced mode disabled");
            None
        }
    };

    let state = AppState {
        router: Arc::new(PredictionRouter::new(
            classifier,
            HeuristicPredictor::new(lexicon.clone()),
            remote,
        )),
        sentiment: Arc::new(SentimentAnalyzer::new()),
        ranker: Arc::new(ExplanationRanker::new(lexicon)),
        extractor: Arc::new(ArticleExtractor::new(config.extract_timeout())?),
    };

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = app(state)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    let listener = TcpListener::bind(&config.server_address()).await?;
    tracing::info!("Server running on http://{}", config.server_address());

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Clone)]
struct AppState {
    router: Arc<PredictionRouter>,
    sentiment: Arc<SentimentAnalyzer>,
    ranker: Arc<ExplanationRanker>,
    extractor: Arc<ArticleExtractor>,
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .route("/sentiment", post(sentiment_handler))
        .route("/explain", post(explain_handler))
        .route("/extract-article", post(extract_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now(),
        model_loaded: state.router.model_loaded(),
        service: SERVICE_NAME.to_string(),
    })
}

#[tracing::instrument(skip(state, request), fields(advanced = request.use_advanced))]
async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    counter!("prediction_requests_total").increment(1);
    let text = require_text(request.text.as_deref(), MIN_PREDICT_LEN)?;

    let mut rng = StdRng::from_entropy();
    let prediction = state
        .router
        .predict(&text, request.use_advanced, &mut rng)
        .await
        // Standard mode cannot fail (the heuristic fallback is
        // infallible), so any error here is an advanced-mode failure.
        .map_err(|e| {
            tracing::warn!(error = %e, "advanced prediction failed");
            ApiError::ServiceUnavailable("advanced prediction is unavailable".to_string())
        })?;

    let sentiment = state.sentiment.analyze(&text);
    tracing::info!(
        label = ?prediction.label,
        confidence = prediction.confidence,
        model_version = %prediction.model_version,
        "Prediction completed"
    );

    Ok(Json(PredictResponse {
        prediction: prediction.label,
        confidence: prediction.confidence,
        sentiment: SentimentSummary {
            label: sentiment.label,
            score: sentiment.score,
        },
        timestamp: chrono::Utc::now(),
        model_version: prediction.model_version,
    }))
}

#[tracing::instrument(skip(state, request))]
async fn sentiment_handler(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<SentimentResponse>, ApiError> {
    counter!("sentiment_requests_total").increment(1);
    let text = require_text(request.text.as_deref(), MIN_SENTIMENT_LEN)?;

    let sentiment = state.sentiment.analyze(&text);

    Ok(Json(SentimentResponse {
        sentiment: SentimentDetail {
            label: sentiment.label,
            score: sentiment.score,
            polarity: sentiment.polarity,
            subjectivity: sentiment.subjectivity,
        },
        timestamp: chrono::Utc::now(),
    }))
}

#[tracing::instrument(skip(state, request))]
async fn explain_handler(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    counter!("explanation_requests_total").increment(1);
    let text = require_text(request.text.as_deref(), MIN_PREDICT_LEN)?;

    let mut rng = StdRng::from_entropy();
    let ranked = state.ranker.explain(&text, &mut rng);
    let (keywords, importance_scores) = ranked.into_iter().unzip();

    Ok(Json(ExplainResponse {
        explanation: Explanation {
            keywords,
            importance_scores,
            method: EXPLANATION_METHOD.to_string(),
            note: EXPLANATION_NOTE.to_string(),
        },
        timestamp: chrono::Utc::now(),
    }))
}

#[tracing::instrument(skip(state, request))]
async fn extract_handler(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    counter!("extraction_requests_total").increment(1);
    let url = require_http_url(request.url.as_deref())?;

    let article = state.extractor.extract(&url).await.map_err(|e| {
        tracing::warn!(url = %url, error = %e, "Article extraction failed");
        ApiError::ExtractionFailed
    })?;

    Ok(Json(ExtractResponse {
        text: article.text,
        title: article.title,
        authors: article.authors,
        publish_date: article.publish_date,
        url: url.to_string(),
        extracted_at: chrono::Utc::now(),
    }))
}

/// Validation runs before any predictor is invoked.
fn require_text(text: Option<&str>, min_len: usize) -> Result<String, ApiError> {
    let text = text.ok_or(ApiError::MissingInput("text"))?.trim();
    if text.chars().count() < min_len {
        return Err(ApiError::TextTooShort { min: min_len });
    }
    Ok(text.to_string())
}

fn require_http_url(url: Option<&str>) -> Result<Url, ApiError> {
    let raw = url.ok_or(ApiError::MissingInput("url"))?.trim();
    let url = Url::parse(raw).map_err(|_| ApiError::InvalidUrl)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl);
    }
    Ok(url)
}
