// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Remote LLM fallback for queries the fast pattern rules miss.

use crate::CoreError;
use async_trait::async_trait;
use geoprompt_nlp::validate::validate;
use geoprompt_nlp::{Gazetteer, IntentResult, IntentSource, ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("classifier returned no text")]
    EmptyResponse,
    #[error("no JSON object in classifier reply")]
    NoJson,
    #[error("classifier reply is not an intent: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("classifier reply rejected: {0}")]
    Invalid(#[from] ValidationError),
}

/// A text-in, text-out language model.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError>;
}

/// Gemini `generateContent` over REST.
#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CoreError::MissingCredential("Gemini API key"));
        }
        Ok(Self {
            client: crate::http_client(timeout)?,
            api_key,
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self.client.post(url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(ClassifierError::Status { status, body });
        }
        let parsed: GenerateContentResponse = response.json().await?;
        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, ClassifierError> {
    let mut candidates = response.candidates.unwrap_or_default();
    let candidate = candidates.pop().ok_or(ClassifierError::EmptyResponse)?;
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ClassifierError::EmptyResponse);
    }
    Ok(text)
}

const PROMPT_TEMPLATE: &str = r#"You extract places from map queries.
Reply with ONE JSON object and nothing else, using exactly these fields:
{"intentType": "route" | "locations",
 "locations": [{"name": string, "timeContext": string}],
 "visualizationType": "route" | "sequence" | "markers" | "region" | "timeline",
 "travelMode": "driving" | "walking" | "cycling" | "transit" | null,
 "confidence": number between 0 and 1,
 "message": string}

Rules:
- Only list places the query actually names. Never invent places.
- Keep the order the places are mentioned in.
- Use "timeline" when places come with dates or eras, "region" for an area
  outlined by several places, "route" for travel between places.

Example query: Drive from Lyon to Geneva
{"intentType":"route","locations":[{"name":"Lyon","timeContext":""},{"name":"Geneva","timeContext":""}],"visualizationType":"route","travelMode":"driving","confidence":0.95,"message":""}

Example query: Where did Caesar fight, Alesia in 52 BC and Pharsalus in 48 BC
{"intentType":"locations","locations":[{"name":"Alesia","timeContext":"52 BC"},{"name":"Pharsalus","timeContext":"48 BC"}],"visualizationType":"timeline","travelMode":null,"confidence":0.9,"message":""}

Query: "#;

pub fn build_prompt(query: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_TEMPLATE.len() + query.len() + 1);
    prompt.push_str(PROMPT_TEMPLATE);
    prompt.push_str(query.trim());
    prompt.push('\n');
    prompt
}

/// Finds the first balanced `{...}` in `text`. Braces inside JSON strings
/// are skipped, so code fences and chatter around the object are tolerated.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses and validates a reply. Clarification is left to the caller.
pub fn parse_reply(
    query: &str,
    reply: &str,
    gazetteer: &Gazetteer,
) -> Result<IntentResult, ClassifierError> {
    let json = extract_json_object(reply).ok_or(ClassifierError::NoJson)?;
    let mut result: IntentResult = serde_json::from_str(json)?;
    validate(query, &result, gazetteer)?;
    result.dedup_locations();
    result.source = IntentSource::Remote;
    result.needs_clarification = false;
    result.clarification = None;
    Ok(result)
}

/// Time-bounded remote classification with strict validation of the reply.
#[derive(Clone)]
pub struct RemoteIntentClassifier {
    backend: Arc<dyn LlmBackend>,
    timeout: Duration,
    gazetteer: &'static Gazetteer,
}

impl RemoteIntentClassifier {
    pub fn new(backend: Arc<dyn LlmBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            gazetteer: Gazetteer::global(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn classify(&self, query: &str) -> Result<IntentResult, ClassifierError> {
        let prompt = build_prompt(query);
        let reply = tokio::time::timeout(self.timeout, self.backend.complete(&prompt))
            .await
            .map_err(|_| ClassifierError::Timeout(self.timeout))??;
        log::debug!("[Classifier] Raw reply: {}", reply);
        let result = parse_reply(query, &reply, self.gazetteer)?;
        log::info!(
            "[Classifier] Remote intent {:?} with {:?}",
            result.visualization_type,
            result.location_names()
        );
        Ok(result)
    }
}
