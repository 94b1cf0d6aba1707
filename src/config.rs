use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GIST_RAW_HOST: &str = "gist.githubusercontent.com";
pub const DEFAULT_DATA_FILE_PATH: &str = "src/hooks/usePortfolioData.ts";
pub const DEFAULT_NETLIFY_APP_DOMAIN: &str = "netlify.app";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub repo_owner: String,
    pub base_repo_name: String,
    pub data_file_path: String,
    pub github_api_url: String,
    pub gist_raw_host: String,
    pub netlify_app_domain: String,
    pub redis_url: Option<String>,
    pub http_timeout: Duration,
    pub bind_addr: String,
    pub bind_port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required and must not be empty")]
    Missing(&'static str),
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("HTTP_TIMEOUT_MS must be a positive integer")]
    InvalidTimeout,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &'static str| read(key).ok_or(ConfigError::Missing(key));

        let bind_port = read("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(5001);
        let http_timeout_ms = read("HTTP_TIMEOUT_MS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| *ms > 0)
                    .ok_or(ConfigError::InvalidTimeout)
            })
            .transpose()?
            .unwrap_or(10_000);

        let config = Self {
            github_token: required("GITHUB_TOKEN")?,
            repo_owner: required("REPO_OWNER")?,
            base_repo_name: required("BASE_REPO_NAME")?,
            data_file_path: read("DATA_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_DATA_FILE_PATH.to_string()),
            github_api_url: read("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gist_raw_host: read("GIST_RAW_HOST")
                .unwrap_or_else(|| DEFAULT_GIST_RAW_HOST.to_string()),
            netlify_app_domain: read("NETLIFY_APP_DOMAIN")
                .unwrap_or_else(|| DEFAULT_NETLIFY_APP_DOMAIN.to_string()),
            redis_url: read("REDIS_URL"),
            http_timeout: Duration::from_millis(http_timeout_ms),
            bind_addr: read("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            bind_port,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
