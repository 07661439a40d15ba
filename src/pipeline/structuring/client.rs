use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::StructuringError;

/// Sampling temperature for structuring. Low on purpose, this is data
/// extraction, not creative writing.
const TEMPERATURE: f32 = 0.1;

/// The structured payload is small JSON, 200 tokens is plenty.
const MAX_TOKENS: u32 = 200;

/// Chat-completion client abstraction (allows mocking for tests).
pub trait LlmClient: Send + Sync {
    fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, StructuringError>;
}

/// OpenAI-compatible chat completions client.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }
}

/// Request body for /v1/chat/completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from /v1/chat/completions
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl LlmClient for OpenAiClient {
    fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, StructuringError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    StructuringError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    StructuringError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    StructuringError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StructuringError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| StructuringError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| StructuringError::ResponseParsing("Empty choices array".into()))
    }
}

// ── Mock for testing ──────────────────────────────────────

/// Mock LLM client replaying canned responses in order. The last
/// response repeats once the queue runs dry.
pub struct MockLlmClient {
    responses: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn with_response(response: &str) -> Self {
        Self {
            responses: Mutex::new(vec![response.to_string()]),
        }
    }

    pub fn with_responses(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl LlmClient for MockLlmClient {
    fn complete(
        &self,
        _model: &str,
        _system: &str,
        _user: &str,
    ) -> Result<String, StructuringError> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| StructuringError::HttpClient("mock poisoned".into()))?;
        if responses.len() > 1 {
            Ok(responses.remove(0))
        } else {
            responses
                .first()
                .cloned()
                .ok_or_else(|| StructuringError::ResponseParsing("Mock exhausted".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_replays_responses_in_order() {
        let mock = MockLlmClient::with_responses(&["first", "second"]);
        assert_eq!(mock.complete("m", "s", "u").unwrap(), "first");
        assert_eq!(mock.complete("m", "s", "u").unwrap(), "second");
        // Last response repeats
        assert_eq!(mock.complete("m", "s", "u").unwrap(), "second");
    }

    #[test]
    fn chat_request_serializes_expected_shape() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 200);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
