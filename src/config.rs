use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Path to the classifier weights (safetensors with "weight" and "bias")
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Path to the fitted TF-IDF vectorizer (JSON vocabulary and idf table)
    #[arg(long, env = "VECTORIZER_PATH")]
    pub vectorizer_path: Option<PathBuf>,

    /// Path to a JSON file overriding the built-in keyword lexicon
    #[arg(long, env = "LEXICON_PATH")]
    pub lexicon_path: Option<PathBuf>,

    /// API key for the remote generative model (advanced mode)
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Remote generative model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub gemini_model: String,

    /// Base URL of the remote generation service
    #[arg(
        long,
        env = "GEMINI_API_URL",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub gemini_api_url: String,

    /// Timeout in seconds for a single remote classification call
    #[arg(long, env = "REMOTE_TIMEOUT_SECS", default_value = "30")]
    pub remote_timeout_secs: u64,

    /// Timeout in seconds for article fetches
    #[arg(long, env = "EXTRACT_TIMEOUT_SECS", default_value = "20")]
    pub extract_timeout_secs: u64,
}

impl Config {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }
}
