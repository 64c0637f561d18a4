use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use advisor_ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};

/// Placeholder keys that MUST NOT be used.
const PLACEHOLDER_API_KEYS: &[&str] = &["YOUR API KEY HERE", "change-me"];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub gemini: GeminiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() || PLACEHOLDER_API_KEYS.contains(&api_key.trim()) {
            bail!("GEMINI_API_KEY is unset or still a placeholder; set it in your .env file");
        }

        let timeout_secs: u64 = lookup("ADVISOR_AI_TIMEOUT_SECS")
            .unwrap_or_else(|| "60".into())
            .parse()
            .context("ADVISOR_AI_TIMEOUT_SECS must be a whole number of seconds")?;

        let port: u16 = lookup("ADVISOR_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("ADVISOR_PORT must be a port number")?;

        Ok(Self {
            host: lookup("ADVISOR_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: lookup("ADVISOR_DB_PATH").unwrap_or_else(|| "advisor.db".into()).into(),
            gemini: GeminiConfig {
                api_key,
                model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
                base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
