use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{ProviderConfig, DEFAULT_API_BASE, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub provider_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL", DEFAULT_MODEL),
            gemini_api_base: optional_env("GEMINI_API_BASE", DEFAULT_API_BASE),
            provider_timeout_secs: parse_timeout_secs(&optional_env("PROVIDER_TIMEOUT_SECS", "60"))?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }

    /// The explicit provider configuration handed to the generative client.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            api_base: self.gemini_api_base.clone(),
            timeout: Duration::from_secs(self.provider_timeout_secs),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// A zero timeout would expire every provider call before it starts.
fn parse_timeout_secs(raw: &str) -> Result<u64> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?;
    anyhow::ensure!(secs > 0, "PROVIDER_TIMEOUT_SECS must be greater than zero");
    Ok(secs)
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_carries_model_and_timeout() {
        let config = Config {
            database_url: "postgres://localhost/learnempower".to_string(),
            gemini_api_key: "test-key".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            provider_timeout_secs: 15,
            port: 8080,
            rust_log: "info".to_string(),
        };

        let provider = config.provider_config();
        assert_eq!(provider.api_key, "test-key");
        assert_eq!(provider.model, "gemini-2.0-flash");
        assert_eq!(provider.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_timeout_must_be_positive() {
        assert_eq!(parse_timeout_secs("60").unwrap(), 60);
        assert_eq!(parse_timeout_secs(" 15 ").unwrap(), 15);

        let err = parse_timeout_secs("0").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
        assert!(parse_timeout_secs("soon").is_err());
    }
}
