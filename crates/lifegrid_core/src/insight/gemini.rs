//! Gemini `generateContent` client.

use super::{GenerationError, NarrativeGenerator};
use crate::config::GeminiConfig;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// Maximum characters of an error body kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 300;

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
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Blocking HTTP generator backed by the Gemini REST API.
pub struct GeminiGenerator {
    config: GeminiConfig,
    agent: ureq::Agent,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn payload(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topP": self.config.top_p,
            },
        })
    }
}

impl NarrativeGenerator for GeminiGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredentials)?;

        debug!(
            "event=gemini_request module=insight status=start model={} prompt_chars={}",
            self.config.model,
            prompt.chars().count()
        );
        let response = self
            .agent
            .post(&self.endpoint())
            .set("content-type", "application/json")
            .set("x-goog-api-key", api_key)
            .send_json(self.payload(prompt));

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(GenerationError::Status {
                    code,
                    body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(GenerationError::Transport(err.to_string()));
            }
        };

        let parsed: GenerateContentResponse = response
            .into_json()
            .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;
        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}
