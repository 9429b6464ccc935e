//! Question answering over a recommendation context.

pub mod context;
pub mod faq;
pub mod openrouter;

use tracing::{debug, warn};

pub use context::{diet_context, history_text, meal_plan_context, parse_history, recipes_context, Speaker};
pub use openrouter::{ChatCompletionRequest, ChatError, ChatMessage, Provider};

const SYSTEM_PROMPT: &str = "You are a helpful diet and nutrition assistant. You answer questions about recommended recipes, ingredients, substitutions, and simple modifications. Keep your answers concise and practical. If a question is unrelated to food or nutrition, politely say you don't know.";
const HISTORY_WINDOW: usize = 6;
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 256;
const EMPTY_REPLY: &str = "I'm not sure how to answer that. Could you rephrase your question?";

#[derive(Debug, Clone)]
pub enum ChatBackend {
    Faq,
    Generative { provider: Provider, model: String },
}

impl ChatBackend {
    pub fn generative(api_key_env_var: &str, model: impl Into<String>) -> Self {
        ChatBackend::Generative {
            provider: Provider::openrouter(api_key_env_var),
            model: model.into(),
        }
    }

    /// Always produces a text answer; backend failures are folded into it.
    pub async fn answer(&self, context: &str, history: &str, question: &str) -> String {
        match self {
            ChatBackend::Faq => faq::quick_answer(question).to_string(),
            ChatBackend::Generative { provider, model } => {
                let request = build_request(model, context, history, question);
                match provider.call_chat_completion(request).await {
                    Ok(response) => match response.first_content() {
                        Ok(content) => clean_reply(content, question),
                        Err(err) => apology(&err),
                    },
                    Err(err) => apology(&err),
                }
            }
        }
    }
}

fn apology(err: &ChatError) -> String {
    warn!(error = %err, "chat completion failed");
    format!("Sorry, I encountered an error: {err}. Please try again.")
}

/// System prompt with the context, then the recent history minus its last
/// line, then the question.
pub fn build_request(model: &str, context: &str, history: &str, question: &str) -> ChatCompletionRequest {
    let mut messages = vec![ChatMessage::system(format!(
        "{SYSTEM_PROMPT}\n\nCurrent Recommendations:\n{context}"
    ))];

    let lines: Vec<&str> = history.trim().lines().collect();
    let recent = &lines[lines.len().saturating_sub(HISTORY_WINDOW)..];
    if let Some((_, earlier)) = recent.split_last() {
        for line in earlier {
            if let Some(rest) = line.strip_prefix("User:") {
                messages.push(ChatMessage::user(rest.trim()));
            } else if let Some(rest) = line.strip_prefix("Assistant:") {
                messages.push(ChatMessage::assistant(rest.trim()));
            }
        }
    }
    messages.push(ChatMessage::user(question));
    debug!(messages = messages.len(), model, "built chat request");

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        temperature: Some(TEMPERATURE),
        max_tokens: Some(MAX_TOKENS),
    }
}

fn clean_reply(content: &str, question: &str) -> String {
    let reply = content.trim();
    let reply = reply.strip_prefix(question).map_or(reply, str::trim);
    if reply.is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        reply.to_string()
    }
}
