//! This module handles the [`TextGenerator`] trait and its implementation over HTTP.

use crate::{GenerationRequest, GreetingError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Something that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for the request. An empty string means the generator had nothing to say.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GreetingError>;
}

/// A client for the Gemini `generateContent` API.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    /// The HTTP client, which pools connections between requests.
    client: reqwest::Client,

    /// The base URL of the API, without a trailing slash.
    endpoint: String,

    /// The API key sent with every request.
    api_key: String,
}

impl GeminiClient {
    /// Create a client for the API at the given base URL.
    pub fn new(endpoint: &str, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// The URL to request content from the given model.
    fn url_for(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.endpoint)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip_all, fields(model = %request.model))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GreetingError> {
        let response = self
            .client
            .post(self.url_for(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from(request))
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Got response from text-generation API");

        let body = response.text().await?;
        if !status.is_success() {
            return Err(GreetingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        trace!(?body);
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        Ok(parsed.text())
    }
}

/// The body of a `generateContent` request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'r> {
    /// The conversation so far, which is just the prompt.
    contents: [Content<'r>; 1],

    /// The sampling settings.
    generation_config: GenerationConfig,
}

impl<'r> From<&'r GenerationRequest> for GenerateContentRequest<'r> {
    fn from(request: &'r GenerationRequest) -> Self {
        Self {
            contents: [Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Content<'r> {
    parts: Vec<Part<'r>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Part<'r> {
    text: &'r str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// The interesting parts of a `generateContent` response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// All the text of the first candidate, or an empty string if there isn't any.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_test() {
        let request = GenerationRequest::greeting("gemini-2.5-flash", "Victoria", "Royal");
        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": request.prompt }] }],
                "generationConfig": { "temperature": 0.8f32 },
            })
        );
    }

    #[test]
    fn url_test() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "key".to_string(),
        );
        assert_eq!(
            client.url_for("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn response_text_test() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {
                        "content": {
                            "parts": [{ "text": "Joyeux " }, { "text": "Noel" }],
                            "role": "model"
                        },
                        "finishReason": "STOP"
                    },
                    { "content": { "parts": [{ "text": "ignored" }] } }
                ],
                "modelVersion": "gemini-2.5-flash"
            }"#,
        )
        .unwrap();
        assert_eq!(response.text(), "Joyeux Noel");
    }

    #[test]
    fn empty_response_text_test() {
        for body in [
            r#"{}"#,
            r#"{ "candidates": [] }"#,
            r#"{ "candidates": [{ "finishReason": "SAFETY" }] }"#,
            r#"{ "candidates": [{ "content": { "parts": [] } }] }"#,
            r#"{ "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }] }"#,
        ] {
            let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
            assert_eq!(response.text(), "", "{body}");
        }
    }
}
