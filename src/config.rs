//! Oracle configuration sourced from the environment.
//!
//! A `.env` file in the working directory is honoured (loaded once at
//! startup in [`crate::run()`]); explicit environment variables win.

use std::env;

use anyhow::{Result, anyhow};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl OracleConfig {
    /// Reads `GOOGLE_API_KEY` (required), `ORACLE_MODEL`, and
    /// `ORACLE_ENDPOINT` from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!("GOOGLE_API_KEY is not set; export it or add it to a .env file")
            })?;
        let model = env::var("ORACLE_MODEL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let endpoint = env::var("ORACLE_ENDPOINT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Ok(Self {
            api_key,
            model,
            endpoint,
        })
    }
}
