use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Accepted names for the OpenAI credential, highest priority first.
pub const API_KEY_VARS: [&str; 3] = ["OPENAI_API_KEY", "openai_api_key", "OPENAI_KEY"];

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub host: String,
    pub port: u16,
    pub frontend_dist: PathBuf,
    pub upstream_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    /// Variables already set in the process win over the file.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(openai_api_key) = resolve_api_key(&lookup) else {
            bail!("Environment variable OPENAI_API_KEY is not set.");
        };

        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get_or_default("PORT", "8000")
            .parse()
            .context("PORT must be a valid port number")?;

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(secs) => Some(Duration::from_secs(
                secs.parse()
                    .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            )),
            None => None,
        };

        Ok(Config {
            openai_api_key,
            openai_base_url: get_or_default("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            openai_model: get_or_default("OPENAI_MODEL", DEFAULT_MODEL),
            host: get_or_default("HOST", "0.0.0.0"),
            port,
            frontend_dist: PathBuf::from(get_or_default("FRONTEND_DIST", "frontend/dist")),
            upstream_timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Walks [`API_KEY_VARS`] in order and returns the first non-empty value.
pub fn resolve_api_key<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|key| lookup(*key))
        .find(|value| !value.is_empty())
}
