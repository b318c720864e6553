use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single chat turn.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    /// The role of the sender (e.g., "user", "assistant", "system").
    pub role: String,
    /// The text content of the message.
    #[serde(default)]
    pub content: String,
}

fn default_chat_temperature() -> f32 {
    0.7
}

fn default_chat_max_tokens() -> u32 {
    200
}

/// Body of `POST /v1/chat/completions`.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    /// Echoed back in the response; the server always uses its loaded model.
    pub model: String,
    /// Conversation so far; only the last message is answered.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_chat_temperature")]
    pub temperature: f32,
    #[serde(default = "default_chat_max_tokens")]
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Content of the last message, or `""` when there are none.
    pub fn last_message(&self) -> &str {
        self.messages.last().map(|m| m.content.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Chat-completion-shaped reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// `chatcmpl-<uuid>`
    pub id: String,
    pub object: String,
    /// Unix timestamp (seconds) of when the reply was produced.
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

impl ChatCompletionResponse {
    pub fn assistant(model: String, content: String, usage: Usage) -> Self {
        Self {
            id: format!("chatcmpl-{}", uuid::Uuid::new_v4()),
            object: "chat.completion".to_string(),
            created: chrono::Utc::now().timestamp(),
            model,
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content,
                },
                finish_reason: "stop".to_string(),
            }],
            usage,
        }
    }
}

fn default_generate_max_tokens() -> u32 {
    256
}

/// Body of `POST /generate`, forwarded to the model untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1))]
    pub prompt: String,
    #[serde(default = "default_generate_max_tokens")]
    #[validate(range(min = 1, max = 4096))]
    pub max_tokens: u32,
    /// Sampling temperature. Value between 0.0 and 2.0.
    #[serde(default = "default_chat_temperature")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Query of `GET /api/analyze`.
#[derive(Debug, Deserialize, Default)]
pub struct AnalyzeQuery {
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /api/ocr`.
#[derive(Debug, Deserialize)]
pub struct OcrRequest {
    /// `data:image/...;base64,` URL or bare base64
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_state: String,
    pub ocr_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatCompletionRequest = serde_json::from_value(json!({
            "model": "tutor",
            "messages": [{"role": "user", "content": "hi"}]
        }))
        .unwrap();

        assert_eq!(req.max_tokens, 200);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(req.last_message(), "hi");
    }

    #[test]
    fn test_empty_messages_give_empty_last_message() {
        let req: ChatCompletionRequest =
            serde_json::from_value(json!({"model": "tutor", "messages": []})).unwrap();
        assert_eq!(req.last_message(), "");
    }

    #[test]
    fn test_generate_request_validation() {
        let ok: GenerateRequest = serde_json::from_value(json!({"prompt": "2+2"})).unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.max_tokens, 256);

        let bad: GenerateRequest =
            serde_json::from_value(json!({"prompt": "", "max_tokens": 0, "temperature": 5.0})).unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("prompt"));
        assert!(fields.contains_key("max_tokens"));
        assert!(fields.contains_key("temperature"));
    }

    #[test]
    fn test_completion_response_shape() {
        let resp = ChatCompletionResponse::assistant("tutor".into(), "Hello".into(), Usage::new(3, 2));
        let value = serde_json::to_value(&resp).unwrap();

        assert!(resp.id.starts_with("chatcmpl-"));
        assert_eq!(value["object"], "chat.completion");
        assert_eq!(value["choices"][0]["message"]["role"], "assistant");
        assert_eq!(value["choices"][0]["finish_reason"], "stop");
        assert_eq!(value["usage"]["total_tokens"], 5);
    }

    #[test]
    fn test_usage_total_saturates() {
        let usage = Usage::new(u32::MAX, 5);
        assert_eq!(usage.total_tokens, u32::MAX);
        assert_eq!(Usage::new(7, 0).total_tokens, 7);
    }
}
