//! Google Gemini model adapter.
//!
//! Talks to the Generative Language API: `generateContent` for chat turns,
//! `batchEmbedContents` for embeddings. Tool use maps onto Gemini function
//! declarations; the API returns `functionCall` parts without ids, so call
//! ids are synthesized here before the orchestration loop sees them.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevahealth_config::ModelConfig;
use sevahealth_core::error::ModelError;
use sevahealth_core::message::{Message, Role};
use sevahealth_core::model::{
    EmbeddingRequest, EmbeddingResponse, ModelProvider, ModelRequest, ModelResponse, ToolSchema,
    Usage,
};
use sevahealth_core::tool::ToolCall;
use tracing::{debug, warn};

/// Default API endpoint for Gemini.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A Gemini model adapter over the Generative Language REST API.
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini adapter.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create an adapter from the `[model]` config section.
    ///
    /// Fails with `NotConfigured` when no API key is available.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ModelError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ModelError::NotConfigured(
                "no API key set (GEMINI_API_KEY env var or [model].api_key)".into(),
            )
        })?;

        Ok(Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    /// Convert our message history to Gemini `contents`.
    ///
    /// System messages become the `systemInstruction` (Gemini has no system
    /// role in `contents`). Tool results become `functionResponse` parts in
    /// a user-role content; Gemini addresses these by function name, so the
    /// name is resolved from the assistant message that requested the call.
    /// Consecutive tool results merge into one content, which is how the API
    /// expects the answers to a multi-call response to arrive.
    fn to_api_contents(messages: &[Message]) -> (Option<ApiSystemInstruction>, Vec<ApiContent>) {
        let mut call_names: HashMap<&str, &str> = HashMap::new();
        for m in messages {
            for tc in &m.tool_calls {
                call_names.insert(tc.id.as_str(), tc.name.as_str());
            }
        }

        let mut system_parts: Vec<ApiPart> = Vec::new();
        let mut contents: Vec<ApiContent> = Vec::new();

        for m in messages {
            match m.role {
                Role::System => system_parts.push(ApiPart::text(&m.content)),
                Role::User => contents.push(ApiContent {
                    role: "user".into(),
                    parts: vec![ApiPart::text(&m.content)],
                }),
                Role::Assistant => {
                    let mut parts = Vec::new();
                    if !m.content.is_empty() {
                        parts.push(ApiPart::text(&m.content));
                    }
                    for tc in &m.tool_calls {
                        parts.push(ApiPart::function_call(ApiFunctionCall {
                            name: tc.name.clone(),
                            args: tc.arguments.clone(),
                        }));
                    }
                    // Gemini rejects a content with no parts
                    if parts.is_empty() {
                        parts.push(ApiPart::text(""));
                    }
                    contents.push(ApiContent {
                        role: "model".into(),
                        parts,
                    });
                }
                Role::Tool => {
                    let name = m
                        .tool_call_id
                        .as_deref()
                        .and_then(|id| call_names.get(id).copied())
                        .unwrap_or("unknown");
                    let part = ApiPart::function_response(ApiFunctionResponse {
                        name: name.to_string(),
                        response: serde_json::json!({ "content": m.content }),
                    });
                    match contents.last_mut() {
                        Some(c)
                            if c.role == "user"
                                && c.parts.iter().all(|p| p.function_response.is_some()) =>
                        {
                            c.parts.push(part);
                        }
                        _ => contents.push(ApiContent {
                            role: "user".into(),
                            parts: vec![part],
                        }),
                    }
                }
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(ApiSystemInstruction {
                parts: system_parts,
            })
        };

        (system_instruction, contents)
    }

    /// Convert tool schemas to Gemini function declarations.
    fn to_api_tools(tools: &[ToolSchema]) -> Vec<ApiTool> {
        if tools.is_empty() {
            return Vec::new();
        }
        vec![ApiTool {
            function_declarations: tools
                .iter()
                .map(|t| ApiFunctionDeclaration {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                })
                .collect(),
        }]
    }

    /// Turn the first candidate into our `ModelResponse`.
    fn parse_response(
        api: GenerateContentResponse,
        requested_model: &str,
    ) -> Result<ModelResponse, ModelError> {
        let candidate = api
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("no candidates in response".into()))?;

        let content = candidate.content.ok_or_else(|| {
            ModelError::InvalidResponse(format!(
                "candidate has no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        let mut text = String::new();
        let mut tool_calls: Vec<ToolCall> = Vec::new();
        for part in content.parts {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(fc) = part.function_call {
                tool_calls.push(ToolCall {
                    id: format!("call_{}", uuid::Uuid::new_v4().simple()),
                    name: fc.name,
                    arguments: fc.args,
                });
            }
        }

        let message = if tool_calls.is_empty() {
            Message::assistant(text)
        } else {
            Message::assistant_with_tool_calls(text, tool_calls)
        };

        let usage = api.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(ModelResponse {
            message,
            model: api
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            usage,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> ModelError {
    if e.is_timeout() {
        ModelError::Timeout(e.to_string())
    } else {
        ModelError::Network(e.to_string())
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn invoke(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        let (system_instruction, contents) = Self::to_api_contents(&request.messages);
        let body = GenerateContentRequest {
            system_instruction,
            contents,
            tools: Self::to_api_tools(&request.tools),
            generation_config: ApiGenerationConfig {
                temperature: request.temperature,
            },
        };

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ModelError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ModelError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Model endpoint returned error");
            return Err(ModelError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            ModelError::InvalidResponse(format!("failed to parse generateContent response: {e}"))
        })?;

        Self::parse_response(api_response, &request.model)
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ModelError> {
        let url = format!(
            "{}/models/{}:batchEmbedContents",
            self.base_url, request.model
        );

        let body = BatchEmbedRequest {
            requests: request
                .inputs
                .iter()
                .map(|text| EmbedContentRequest {
                    model: format!("models/{}", request.model),
                    content: EmbedContent {
                        parts: vec![ApiPart::text(text)],
                    },
                })
                .collect(),
        };

        debug!(
            model = %request.model,
            count = request.inputs.len(),
            "Sending embedding request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ModelError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(ModelError::AuthenticationFailed("Invalid API key".into()));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ModelError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: BatchEmbedResponse = response.json().await.map_err(|e| {
            ModelError::InvalidResponse(format!("failed to parse embedding response: {e}"))
        })?;

        if api_resp.embeddings.len() != request.inputs.len() {
            return Err(ModelError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                request.inputs.len(),
                api_resp.embeddings.len()
            )));
        }

        Ok(EmbeddingResponse {
            embeddings: api_resp.embeddings.into_iter().map(|e| e.values).collect(),
            model: request.model,
        })
    }

    async fn health_check(&self) -> Result<bool, ModelError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        Ok(response.status().is_success())
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiSystemInstruction>,
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
    generation_config: ApiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct ApiSystemInstruction {
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<ApiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<ApiFunctionResponse>,
}

impl ApiPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_call: None,
            function_response: None,
        }
    }

    fn function_call(fc: ApiFunctionCall) -> Self {
        Self {
            text: None,
            function_call: Some(fc),
            function_response: None,
        }
    }

    fn function_response(fr: ApiFunctionResponse) -> Self {
        Self {
            text: None,
            function_call: None,
            function_response: Some(fr),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTool {
    function_declarations: Vec<ApiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct ApiFunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ApiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    usage_metadata: Option<ApiUsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

// --- Embedding API types ---

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: EmbedContent,
}

#[derive(Debug, Serialize)]
struct EmbedContent {
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ApiEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ApiEmbedding {
    values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_trims_trailing_slash() {
        let provider = GeminiProvider::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "test-key",
            Duration::from_secs(120),
        );
        assert_eq!(provider.name(), "gemini");
        assert!(!provider.base_url.ends_with('/'));
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = ModelConfig::default();
        assert!(config.api_key.is_none());
        let result = GeminiProvider::from_config(&config);
        assert!(matches!(result, Err(ModelError::NotConfigured(_))));
    }

    #[test]
    fn system_message_becomes_system_instruction() {
        let messages = vec![
            Message::system("You are a health assistant for rural India."),
            Message::user("Hello"),
        ];
        let (system, contents) = GeminiProvider::to_api_contents(&messages);

        let system = system.unwrap();
        assert_eq!(system.parts.len(), 1);
        assert_eq!(
            system.parts[0].text.as_deref(),
            Some("You are a health assistant for rural India.")
        );

        // The system message does not appear in contents
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, "user");
    }

    #[test]
    fn assistant_role_maps_to_model() {
        let messages = vec![Message::user("Hi"), Message::assistant("Namaste!")];
        let (_, contents) = GeminiProvider::to_api_contents(&messages);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[1].parts[0].text.as_deref(), Some("Namaste!"));
    }

    #[test]
    fn tool_calls_become_function_call_parts() {
        let messages = vec![Message::assistant_with_tool_calls(
            "",
            vec![ToolCall {
                id: "call_1".into(),
                name: "find_hospitals".into(),
                arguments: serde_json::json!({"pincode": 411001}),
            }],
        )];
        let (_, contents) = GeminiProvider::to_api_contents(&messages);

        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, "model");
        let fc = contents[0].parts[0].function_call.as_ref().unwrap();
        assert_eq!(fc.name, "find_hospitals");
        assert_eq!(fc.args["pincode"], 411001);
    }

    #[test]
    fn tool_result_resolves_function_name_from_call_id() {
        let messages = vec![
            Message::assistant_with_tool_calls(
                "",
                vec![ToolCall {
                    id: "call_9".into(),
                    name: "search_documents".into(),
                    arguments: serde_json::json!({"query": "dengue"}),
                }],
            ),
            Message::tool_result("call_9", "[{\"content\":\"Dengue is viral.\"}]"),
        ];
        let (_, contents) = GeminiProvider::to_api_contents(&messages);

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[1].role, "user");
        let fr = contents[1].parts[0].function_response.as_ref().unwrap();
        assert_eq!(fr.name, "search_documents");
        assert_eq!(fr.response["content"], "[{\"content\":\"Dengue is viral.\"}]");
    }

    #[test]
    fn consecutive_tool_results_merge_into_one_content() {
        let messages = vec![
            Message::assistant_with_tool_calls(
                "",
                vec![
                    ToolCall {
                        id: "call_a".into(),
                        name: "find_hospitals".into(),
                        arguments: serde_json::json!({"pincode": 411001}),
                    },
                    ToolCall {
                        id: "call_b".into(),
                        name: "search_documents".into(),
                        arguments: serde_json::json!({"query": "fracture"}),
                    },
                ],
            ),
            Message::tool_result("call_a", "[]"),
            Message::tool_result("call_b", "[]"),
        ];
        let (_, contents) = GeminiProvider::to_api_contents(&messages);

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[1].parts.len(), 2);
        assert_eq!(
            contents[1].parts[0].function_response.as_ref().unwrap().name,
            "find_hospitals"
        );
        assert_eq!(
            contents[1].parts[1].function_response.as_ref().unwrap().name,
            "search_documents"
        );
    }

    #[test]
    fn tool_schema_conversion() {
        let tools = vec![ToolSchema {
            name: "find_hospitals".into(),
            description: "Find government hospitals near a pincode".into(),
            parameters: serde_json::json!({"type": "object"}),
        }];
        let api_tools = GeminiProvider::to_api_tools(&tools);
        assert_eq!(api_tools.len(), 1);
        assert_eq!(api_tools[0].function_declarations.len(), 1);
        assert_eq!(api_tools[0].function_declarations[0].name, "find_hospitals");
    }

    #[test]
    fn no_tools_serializes_without_tools_field() {
        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![],
            tools: GeminiProvider::to_api_tools(&[]),
            generation_config: ApiGenerationConfig { temperature: 0.0 },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("\"tools\""));
        assert!(json.contains("generationConfig"));
    }

    #[test]
    fn request_body_uses_camel_case_keys() {
        let messages = vec![Message::system("primer"), Message::user("hi")];
        let (system_instruction, contents) = GeminiProvider::to_api_contents(&messages);
        let body = GenerateContentRequest {
            system_instruction,
            contents,
            tools: vec![],
            generation_config: ApiGenerationConfig { temperature: 0.0 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert!(json.get("generationConfig").is_some());
    }

    // --- Response parsing tests ---

    #[test]
    fn parse_text_candidate() {
        let data = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Drink plenty of fluids."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 6, "totalTokenCount": 18},
            "modelVersion": "gemini-2.5-flash"
        }"#;
        let api: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let response = GeminiProvider::parse_response(api, "gemini-2.5-flash").unwrap();

        assert_eq!(response.message.content, "Drink plenty of fluids.");
        assert!(response.message.tool_calls.is_empty());
        assert_eq!(response.model, "gemini-2.5-flash");
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 6);
        assert_eq!(usage.total_tokens, 18);
    }

    #[test]
    fn parse_function_call_candidate_synthesizes_ids() {
        let data = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "find_hospitals", "args": {"pincode": 411001}}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let api: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let response = GeminiProvider::parse_response(api, "gemini-2.5-flash").unwrap();

        let calls = response.message.tool_calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "find_hospitals");
        assert_eq!(calls[0].arguments["pincode"], 411001);
        assert!(calls[0].id.starts_with("call_"));
    }

    #[test]
    fn parse_mixed_text_and_function_call() {
        let data = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Let me check nearby hospitals."},
                        {"functionCall": {"name": "find_hospitals", "args": {"pincode": 413102}}}
                    ]
                }
            }]
        }"#;
        let api: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let response = GeminiProvider::parse_response(api, "gemini-2.5-flash").unwrap();

        assert_eq!(response.message.content, "Let me check nearby hospitals.");
        assert_eq!(response.message.tool_calls.len(), 1);
    }

    #[test]
    fn parse_parallel_function_calls_in_listed_order() {
        let data = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "find_hospitals", "args": {"pincode": 411001}}},
                        {"functionCall": {"name": "search_documents", "args": {"query": "fracture care"}}}
                    ]
                }
            }]
        }"#;
        let api: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let response = GeminiProvider::parse_response(api, "gemini-2.5-flash").unwrap();

        let calls = response.message.tool_calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "find_hospitals");
        assert_eq!(calls[1].name, "search_documents");
        assert_ne!(calls[0].id, calls[1].id);
    }

    #[test]
    fn no_candidates_is_invalid_response() {
        let data = r#"{"candidates": []}"#;
        let api: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let result = GeminiProvider::parse_response(api, "gemini-2.5-flash");
        assert!(matches!(result, Err(ModelError::InvalidResponse(_))));
    }

    #[test]
    fn candidate_without_content_reports_finish_reason() {
        let data = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let api: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let err = GeminiProvider::parse_response(api, "gemini-2.5-flash").unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn missing_model_version_falls_back_to_requested() {
        let data = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "ok"}]}
            }]
        }"#;
        let api: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let response = GeminiProvider::parse_response(api, "gemini-2.5-flash").unwrap();
        assert_eq!(response.model, "gemini-2.5-flash");
    }

    #[test]
    fn parse_batch_embedding_response() {
        let data = r#"{
            "embeddings": [
                {"values": [0.1, 0.2, 0.3]},
                {"values": [0.4, 0.5, 0.6]}
            ]
        }"#;
        let parsed: BatchEmbedResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.embeddings.len(), 2);
        assert_eq!(parsed.embeddings[0].values, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn embed_request_body_shape() {
        let body = BatchEmbedRequest {
            requests: vec![EmbedContentRequest {
                model: "models/gemini-embedding-001".into(),
                content: EmbedContent {
                    parts: vec![ApiPart::text("malaria prevention")],
                },
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["requests"][0]["model"], "models/gemini-embedding-001");
        assert_eq!(
            json["requests"][0]["content"]["parts"][0]["text"],
            "malaria prevention"
        );
    }
}
