//! Text-matching oracle abstraction.
//!
//! The core treats the oracle as an opaque text-in/text-out collaborator
//! with three call shapes: column matching, SQL translation, and data
//! summarization. [`GeminiOracle`] backs those calls with the Gemini
//! `generateContent` REST endpoint; tests substitute a scripted fake.
//! Calls are synchronous and carry no timeout, retry, or caching policy.

use itertools::Itertools;
use log::debug;
use reqwest::blocking::Client;
use serde_json::json;
use thiserror::Error;

use crate::config::OracleConfig;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("oracle endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("oracle response contained no text")]
    EmptyResponse,
}

pub trait TextOracle {
    /// Returns the destination column name for one spreadsheet header,
    /// given the current candidate columns. The response is not validated
    /// against the candidate list.
    fn map_column(&self, header: &str, candidates: &[String]) -> Result<String, OracleError>;

    /// Translates a natural-language question or command into a single SQL
    /// statement for the described schema.
    fn translate_to_sql(&self, schema: &str, question: &str) -> Result<String, OracleError>;

    /// Answers an analytical prompt over a tabular data export.
    fn summarize(&self, data: &str, prompt: &str) -> Result<String, OracleError>;
}

pub struct GeminiOracle {
    config: OracleConfig,
    client: Client,
}

impl GeminiOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        );
        debug!(
            "Oracle request to model '{}' ({} prompt bytes)",
            self.config.model,
            prompt.len()
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let response = self.client.post(&url).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let truncated = body.chars().take(200).collect::<String>();
            return Err(OracleError::Http {
                status: status.as_u16(),
                body: truncated,
            });
        }
        let payload: serde_json::Value = response.json()?;
        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(OracleError::EmptyResponse)?;
        if text.is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

impl TextOracle for GeminiOracle {
    fn map_column(&self, header: &str, candidates: &[String]) -> Result<String, OracleError> {
        let prompt = format!(
            "Find the best match for the column '{header}' from the following options: {}. \
             Respond with the matching column name only.",
            candidates.iter().join(", ")
        );
        self.generate(&prompt)
    }

    fn translate_to_sql(&self, schema: &str, question: &str) -> Result<String, OracleError> {
        let prompt = format!(
            "You translate requests about a product inventory into a single SQLite statement.\n\
             \n\
             {schema}\n\
             \n\
             Request: {question}\n\
             \n\
             Return only the SQL statement, with no explanation and no code fences."
        );
        self.generate(&prompt)
    }

    fn summarize(&self, data: &str, prompt: &str) -> Result<String, OracleError> {
        let full_prompt = format!(
            "You are an expert in data analysis helping non-technical people understand \
             a product inventory.\n\
             \n\
             The inventory data, as CSV:\n\
             {data}\n\
             \n\
             {prompt}"
        );
        self.generate(&full_prompt)
    }
}
