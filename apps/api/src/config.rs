use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_RESOURCES_PATH: &str = "data/resources.json";
const DEFAULT_QUESTION_BANK_PATH: &str = "data/question_bank.json";

/// Application configuration loaded from environment variables.
/// Everything has a default except the optional overrides below.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub resources_path: PathBuf,
    pub question_bank_path: PathBuf,
    /// Vocabulary override (TOML). Built-in tables when unset.
    pub vocabulary_path: Option<PathBuf>,
    /// Enables the LLM responder. Template responses when unset.
    pub anthropic_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            resources_path: env_or("RESOURCES_PATH", DEFAULT_RESOURCES_PATH).into(),
            question_bank_path: env_or("QUESTION_BANK_PATH", DEFAULT_QUESTION_BANK_PATH).into(),
            vocabulary_path: optional_env("VOCABULARY_PATH").map(PathBuf::from),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Unset and blank are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// Defaults without touching the environment.
    pub fn for_tests() -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            resources_path: DEFAULT_RESOURCES_PATH.into(),
            question_bank_path: DEFAULT_QUESTION_BANK_PATH.into(),
            vocabulary_path: None,
            anthropic_api_key: None,
        }
    }
}
