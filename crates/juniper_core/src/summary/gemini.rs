//! Gemini `generateContent` client.
//!
//! # Responsibility
//! - Send one prompt per call over blocking HTTP.
//! - Extract the concatenated candidate text from the response.
//!
//! # Invariants
//! - The API key is sent as a header and never logged.

use crate::config::GeminiConfig;
use crate::summary::{SummaryError, SummaryGenerator};
use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Blocking client for the Gemini text generation endpoint.
pub struct GeminiClient {
    http: Client,
    url: String,
    api_key: String,
}

impl GeminiClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    /// - `MissingApiKey` when no key is configured.
    /// - `Transport` when the HTTP client cannot be constructed.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, SummaryError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SummaryError::MissingApiKey)?
            .to_string();

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            url: generate_content_url(&config.endpoint, &config.model),
            api_key,
        })
    }
}

impl SummaryGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(
            "event=summary_request module=summary status=start prompt_chars={}",
            prompt.chars().count()
        );

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(SummaryError::Status {
                code: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        extract_text(&body)
    }
}

fn generate_content_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    )
}

/// Concatenates every text part of the first candidate.
///
/// A response with no candidates or no text yields an empty string, which
/// callers map to the "no summary" message.
fn extract_text(body: &str) -> Result<String, SummaryError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|err| SummaryError::InvalidResponse(err.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}
