//! Client for an OpenAI-compatible chat-completion API, used to summarize
//! uploaded trust and will documents.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1000;

pub const SYSTEM_PROMPT: &str = "You are a legal assistant who summarizes estate planning \
documents (trusts and wills) for estate settlement attorneys. Be factual and concise. \
If something is not stated in the document, say that it is not stated.";

/// Build the single-turn user prompt for a document summary.
pub fn build_summary_prompt(document_text: &str) -> String {
    format!(
        "Summarize the following estate planning document. Use these sections:\n\
         1. Document type (trust, will, amendment, or other) and date signed\n\
         2. Grantor/testator\n\
         3. Trustees or executors, including successors\n\
         4. Beneficiaries and what each receives\n\
         5. Notable provisions (conditions, restrictions, powers, no-contest clauses)\n\
         6. Anything that suggests probate or court involvement may be required\n\n\
         Document text:\n\"\"\"\n{document_text}\n\"\"\""
    )
}

/// Anything that can turn a prompt into text.
#[allow(async_fn_in_trait)]
pub trait Completer: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_choice_text(response: ChatResponse) -> Result<String, String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Completion service returned no text".to_string())
}

/// reqwest-backed chat-completion client.
pub struct CompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    /// Build from `COMPLETION_API_KEY`, `COMPLETION_API_URL`, `COMPLETION_MODEL`
    /// and `COMPLETION_TIMEOUT_SECS` (default 60).
    pub fn from_env() -> Result<Self, String> {
        let api_key = std::env::var("COMPLETION_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| "COMPLETION_API_KEY is not configured".to_string())?;
        let api_url =
            std::env::var("COMPLETION_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model =
            std::env::var("COMPLETION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs: u64 = crate::config::env_parse("COMPLETION_TIMEOUT_SECS", 60);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            api_url,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Completer for CompletionClient {
    #[tracing::instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Completion request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Completion API error ({}): {}", status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid completion response: {}", e))?;

        first_choice_text(parsed)
    }
}
