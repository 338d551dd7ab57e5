//! Gemini REST client
//!
//! Talks to the `generateContent` endpoint directly: reference images are
//! interleaved with their labels as inline base64 parts, the main prompt
//! goes last, and the response carries the generated image back the same
//! way. The blocking HTTP call runs on the blocking pool so pipeline
//! workers keep their threads.

use crate::error::{FabulaError, FabulaResult};
use crate::generate::{GenerationRequest, ImageGenerator};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Matches the frame geometry downstream (content area is ~3:2)
const ASPECT_RATIO: &str = "3:2";

/// Image generation regularly takes minutes
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Error bodies are truncated to this many bytes in diagnostics
const ERROR_BODY_LIMIT: usize = 500;

/// Generated payloads can run to tens of megabytes of base64
const RESPONSE_BODY_LIMIT: u64 = 64 * 1024 * 1024;

#[derive(Clone)]
pub struct GeminiClient {
    agent: ureq::Agent,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from the environment, failing fast when the key is
    /// absent so no generation work starts that cannot finish.
    pub fn from_env(model: &str) -> FabulaResult<Self> {
        let api_key = std::env::var(API_KEY_VAR).unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(FabulaError::ApiKeyMissing);
        }

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .new_agent();

        Ok(Self {
            agent,
            model: model.to_string(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{ENDPOINT}/{}:generateContent", self.model)
    }

    fn generate_blocking(&self, request: &GenerationRequest) -> FabulaResult<Vec<u8>> {
        let body = build_body(request)?;
        debug!(
            "Calling {} with {} reference images",
            self.model,
            request.refs.len()
        );

        let mut response = self
            .agent
            .post(&self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .send_json(&body)
            .map_err(|e| FabulaError::ApiTransport(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response
                .body_mut()
                .read_to_string()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FabulaError::Api {
                status,
                message: truncate(&message, ERROR_BODY_LIMIT),
            });
        }

        let parsed: GenerateContentResponse = response
            .body_mut()
            .with_config()
            .limit(RESPONSE_BODY_LIMIT)
            .read_json()
            .map_err(|e| FabulaError::ApiTransport(e.to_string()))?;

        extract_image(parsed)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> FabulaResult<Vec<u8>> {
        let client = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || client.generate_blocking(&request))
            .await
            .map_err(|e| FabulaError::Internal(format!("generation task panicked: {e}")))?
    }
}

// Wire types. The REST API speaks camelCase JSON.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfigBody,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfigBody {
    response_modalities: Vec<String>,
    image_config: ImageConfigBody,

    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfigBody {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

/// Interleave each reference image with its label, main prompt last
fn build_body(request: &GenerationRequest) -> FabulaResult<GenerateContentRequest> {
    let mut parts = Vec::with_capacity(request.refs.len() * 2 + 1);

    for reference in &request.refs {
        let bytes = std::fs::read(&reference.path).map_err(|e| {
            FabulaError::io(
                format!("reading reference image {}", reference.path.display()),
                e,
            )
        })?;
        parts.push(Part {
            inline_data: Some(InlineData {
                mime_type: "image/jpeg".to_string(),
                data: STANDARD.encode(bytes),
            }),
            ..Default::default()
        });
        parts.push(Part {
            text: Some(reference.label.clone()),
            ..Default::default()
        });
    }

    parts.push(Part {
        text: Some(request.prompt.clone()),
        ..Default::default()
    });

    Ok(GenerateContentRequest {
        contents: vec![Content { parts }],
        generation_config: GenerationConfigBody {
            response_modalities: vec!["IMAGE".to_string()],
            image_config: ImageConfigBody {
                aspect_ratio: ASPECT_RATIO.to_string(),
            },
            seed: request.seed,
        },
    })
}

fn extract_image(response: GenerateContentResponse) -> FabulaResult<Vec<u8>> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(FabulaError::ApiResponse(
            "no candidates returned, likely content filtering or rate limiting".to_string(),
        ));
    };

    let finish_reason = candidate
        .finish_reason
        .unwrap_or_else(|| "unknown".to_string());
    let parts = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default();

    let Some(inline) = parts.into_iter().find_map(|part| part.inline_data) else {
        return Err(FabulaError::ApiResponse(format!(
            "no image in the response (finish reason: {finish_reason})"
        )));
    };

    STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| FabulaError::ApiResponse(format!("image payload is not valid base64: {e}")))
}

fn truncate(message: &str, max: usize) -> String {
    if message.len() <= max {
        return message.to_string();
    }
    let mut end = max;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &message[..end])
}
