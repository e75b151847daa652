use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{
    prompts::LEGAL_STAFFING_SYSTEM, GenerationSettings, DEFAULT_API_URL, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

const DEFAULT_ROSTER_PATH: &str = "Cleaned_Matters_OGC.csv";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub roster_path: PathBuf,
    pub heuristics_path: Option<PathBuf>,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub llm_temperature: f32,
    pub llm_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let llm_temperature = or_default("LLM_TEMPERATURE", &DEFAULT_TEMPERATURE.to_string())
            .parse::<f32>()
            .context("LLM_TEMPERATURE must be a number")?;
        anyhow::ensure!(
            (0.0..=1.0).contains(&llm_temperature),
            "LLM_TEMPERATURE must be between 0.0 and 1.0, got {llm_temperature}"
        );

        let llm_max_tokens = or_default("LLM_MAX_TOKENS", &DEFAULT_MAX_TOKENS.to_string())
            .parse::<u32>()
            .context("LLM_MAX_TOKENS must be a positive integer")?;
        anyhow::ensure!(llm_max_tokens > 0, "LLM_MAX_TOKENS must be a positive integer, got 0");

        let llm_timeout_secs = or_default("LLM_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;
        anyhow::ensure!(llm_timeout_secs > 0, "LLM_TIMEOUT_SECS must be at least 1, got 0");

        Ok(Config {
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            anthropic_api_url: or_default("ANTHROPIC_API_URL", DEFAULT_API_URL),
            roster_path: PathBuf::from(or_default("ROSTER_PATH", DEFAULT_ROSTER_PATH)),
            heuristics_path: lookup("HEURISTICS_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            llm_model: or_default("LLM_MODEL", DEFAULT_MODEL),
            llm_max_tokens,
            llm_temperature,
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.llm_model.clone(),
            max_tokens: self.llm_max_tokens,
            temperature: self.llm_temperature,
            system: LEGAL_STAFFING_SYSTEM.to_string(),
        }
    }
}
