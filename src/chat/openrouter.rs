use std::env;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    Api {
        status: StatusCode,
        error_body: String,
    },
    #[error("API returned no choices")]
    EmptyResponse,
}

/// A model name and the upstream provider OpenRouter should route it to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenRouterAvailableModel {
    pub model_name: &'static str,
    pub model_source: &'static str,
}

pub const OPENROUTER_MODELS: &[OpenRouterAvailableModel] = &[OpenRouterAvailableModel {
    model_name: "qwen/qwen3-32b",
    model_source: "cerebras",
}];

/// Pinned upstream provider for a known model; unknown models use OpenRouter's
/// default routing.
pub fn model_source(model: &str) -> Option<&'static str> {
    OPENROUTER_MODELS
        .iter()
        .find(|m| m.model_name == model)
        .map(|m| m.model_source)
}

/// JSON body for a completion call, with the provider pin when one is known.
pub fn request_payload(request: &ChatCompletionRequest) -> Result<serde_json::Value, ChatError> {
    let mut payload = serde_json::to_value(request)?;
    if let (Some(source), Some(obj)) = (model_source(&request.model), payload.as_object_mut()) {
        obj.insert("provider".to_string(), json!({ "only": [source] }));
    }
    Ok(payload)
}

#[derive(Clone, Debug, Serialize)]
pub enum Provider {
    OpenRouter {
        /// Name of the environment variable holding the key, read per call.
        api_key: String,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponseMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
}

impl ChatCompletionResponse {
    pub fn first_content(&self) -> Result<&str, ChatError> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or(ChatError::EmptyResponse)
    }
}

impl Provider {
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        Self::OpenRouter {
            api_key: api_key_env_var_name.to_string(),
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .map_err(|_| ChatError::MissingApiKey(api_key_env_var_name.clone()))?;

                let payload = request_payload(&request)?;

                let site_url =
                    env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
                let app_name =
                    env::var("APP_NAME").unwrap_or_else(|_| "MealRecommender".to_string());

                let response = Client::new()
                    .post(OPENROUTER_CHAT_URL)
                    .bearer_auth(actual_api_key)
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&payload)
                    .send()
                    .await?;

                if response.status().is_success() {
                    Ok(response.json::<ChatCompletionResponse>().await?)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ChatError::Api { status, error_body })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_skips_unset_options() -> anyhow::Result<()> {
        let request = ChatCompletionRequest {
            model: "qwen/qwen3-32b".to_string(),
            messages: vec![ChatMessage::user("Hello")],
            temperature: None,
            max_tokens: Some(256),
        };
        let value = serde_json::to_value(&request)?;
        assert!(value.get("temperature").is_none());
        assert_eq!(value["max_tokens"], 256);
        assert_eq!(value["messages"][0]["role"], "user");
        Ok(())
    }

    #[test]
    fn test_known_models_pin_their_provider() -> anyhow::Result<()> {
        let mut request = ChatCompletionRequest {
            model: "qwen/qwen3-32b".to_string(),
            messages: vec![ChatMessage::user("Hello")],
            temperature: None,
            max_tokens: None,
        };
        assert_eq!(request_payload(&request)?["provider"]["only"][0], "cerebras");

        assert_eq!(model_source(crate::config::DEFAULT_CHAT_MODEL), Some("cerebras"));

        request.model = "some/other-model".to_string();
        assert!(model_source(&request.model).is_none());
        assert!(request_payload(&request)?.get("provider").is_none());
        Ok(())
    }

    #[test]
    fn test_response_first_content() -> anyhow::Result<()> {
        let body = r#"{"id":"x","model":"m","created":1,"choices":[{"index":0,"finish_reason":"stop","message":{"role":"assistant","content":"Hi"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body)?;
        assert_eq!(response.first_content()?, "Hi");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"model":"m","choices":[]}"#)?;
        assert!(matches!(empty.first_content(), Err(ChatError::EmptyResponse)));
        Ok(())
    }
}
