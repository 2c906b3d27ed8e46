//! Sampling settings and the Anthropic messages wire format used for the
//! hosted text-generation model.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model_id: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub anthropic_version: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            anthropic_version: BEDROCK_ANTHROPIC_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    pub settings: &'a GenerationSettings,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

pub fn encode_messages_request(request: GenerationRequest<'_>) -> Result<Vec<u8>, String> {
    let body = MessagesRequest {
        anthropic_version: &request.settings.anthropic_version,
        max_tokens: request.settings.max_tokens,
        temperature: request.settings.temperature,
        messages: [Message {
            role: "user",
            content: request.prompt,
        }],
    };
    serde_json::to_vec(&body).map_err(|error| format!("failed to encode model request: {error}"))
}

/// Extracts the first text block from a messages response body.
pub fn decode_messages_response(body: &[u8]) -> Result<String, String> {
    let response: MessagesResponse = serde_json::from_slice(body)
        .map_err(|error| format!("failed to decode model response envelope: {error}"))?;

    response
        .content
        .into_iter()
        .find(|block| block.block_type == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| "model response contained no text content".to_string())
}
