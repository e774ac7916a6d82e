//! External text summarization client.
//!
//! # Responsibility
//! - Define the `Summarizer` seam used by the annotation pipeline.
//! - Provide the HTTP-backed implementation built from `SummarizerConfig`.
//!
//! # Invariants
//! - `summarize` never fails: every problem is returned as error text that
//!   stands in for the summary.
//! - Exactly one request per call; no retries.
//! - The client is built once and read-only afterwards.

use crate::config::SummarizerConfig;
use log::{error, info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Text returned when no API key was configured.
pub const NOT_INITIALIZED_TEXT: &str =
    "summarizer not initialized: set the GENAI_API_KEY environment variable";

const PROMPT_PREFIX: &str = "Summarize the following gene data in a single, concise paragraph:";

/// Produces a plain-text summary for record text.
pub trait Summarizer {
    /// Returns the summary, or an error marker text on failure.
    fn summarize(&self, text: &str) -> String;
}

/// `generateContent` client for Gemini-style endpoints.
pub struct GeminiSummarizer {
    config: SummarizerConfig,
    client: Result<Client, String>,
}

impl GeminiSummarizer {
    /// Builds the client; a missing API key yields a disabled summarizer.
    pub fn new(config: SummarizerConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| format!("could not build summarizer HTTP client: {err}"));
        if config.api_key.is_none() {
            warn!("event=summarizer_init module=summarize status=disabled reason=missing_api_key");
        } else {
            info!(
                "event=summarizer_init module=summarize status=ok model={}",
                config.model
            );
        }
        Self { config, client }
    }

    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint, self.config.model
        )
    }

    fn call(&self, api_key: &str, text: &str) -> Result<String, String> {
        let client = self.client.as_ref().map_err(Clone::clone)?;
        let response = client
            .post(self.request_url())
            .query(&[("key", api_key)])
            .json(&GenerateRequest::for_prompt(&build_prompt(text)))
            .send()
            .map_err(|err| format!("request failed: {err}"))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| format!("could not read response body: {err}"))?;
        if !status.is_success() {
            return Err(format!("status={status}: {}", body.trim()));
        }
        parse_response_text(&body)
    }
}

impl Summarizer for GeminiSummarizer {
    fn summarize(&self, text: &str) -> String {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return NOT_INITIALIZED_TEXT.to_string();
        };

        let started_at = Instant::now();
        match self.call(api_key, text) {
            Ok(summary) => {
                info!(
                    "event=summarize module=summarize status=ok duration_ms={} chars={}",
                    started_at.elapsed().as_millis(),
                    summary.chars().count()
                );
                summary
            }
            Err(err) => {
                error!(
                    "event=summarize module=summarize status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                format!("summarizer API error: {err}")
            }
        }
    }
}

/// Prompt sent for one record's text.
pub fn build_prompt(text: &str) -> String {
    format!("{PROMPT_PREFIX}\n{text}")
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn for_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Extracts the trimmed first candidate text from a response body.
fn parse_response_text(body: &str) -> Result<String, String> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|err| format!("invalid response JSON: {err}"))?;
    response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .map(|part| part.text.trim().to_string())
        .find(|text| !text.is_empty())
        .ok_or_else(|| "response carried no candidate text".to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        build_prompt, parse_response_text, GeminiSummarizer, GenerateRequest, Summarizer,
        NOT_INITIALIZED_TEXT,
    };
    use crate::config::SummarizerConfig;

    #[test]
    fn missing_api_key_returns_not_initialized_text() {
        let summarizer = GeminiSummarizer::new(SummarizerConfig::default());
        assert!(!summarizer.is_enabled());
        assert_eq!(summarizer.summarize("G1 BRCA1"), NOT_INITIALIZED_TEXT);
    }

    #[test]
    fn unreachable_endpoint_degrades_to_error_text() {
        let summarizer = GeminiSummarizer::new(SummarizerConfig {
            api_key: Some("test-key".to_string()),
            endpoint: "http://127.0.0.1:9".to_string(),
            ..SummarizerConfig::default()
        });
        let summary = summarizer.summarize("G1 BRCA1");
        assert!(summary.starts_with("summarizer API error:"), "{summary}");
    }

    #[test]
    fn request_body_wraps_prompt_in_contents() {
        let body = serde_json::to_value(GenerateRequest::for_prompt(&build_prompt("G1")))
            .expect("serialize request");
        let text = body["contents"][0]["parts"][0]["text"]
            .as_str()
            .expect("prompt text");
        assert!(text.ends_with("\nG1"));
        assert!(text.starts_with("Summarize the following gene data"));
    }

    #[test]
    fn parses_first_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  BRCA1 repairs DNA.\n"}],"role":"model"}}]}"#;
        assert_eq!(
            parse_response_text(body).expect("candidate text"),
            "BRCA1 repairs DNA."
        );
    }

    #[test]
    fn rejects_responses_without_text() {
        assert!(parse_response_text(r#"{"candidates":[]}"#).is_err());
        assert!(parse_response_text("not json").is_err());
    }
}
