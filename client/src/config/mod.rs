//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the API base URL, request timeouts, and the path to the durable
//! persist-login flag file.

use anyhow::{Context, Result};
use expanduser::expanduser;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the poll service API, without a trailing slash.
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
    pub persist_path: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".to_string());

        let request_timeout_seconds = env::var("REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECONDS must be a valid number")?;

        let persist_path = env::var("PERSIST_PATH")
            .unwrap_or_else(|_| "~/.sportsvoting/persist.json".to_string());

        Ok(Config {
            api_base_url,
            request_timeout_seconds,
            persist_path,
        })
    }

    /// Resolves the persist flag file path, expanding a leading `~`.
    pub fn persist_file(&self) -> Result<PathBuf> {
        expanduser(&self.persist_path).context("unable to expand PERSIST_PATH")
    }
}
