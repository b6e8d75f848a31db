//! Blocking HTTP client for the hosted inference APIs.

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::agent_runner::{ExecutionError, Model, Provider};
use crate::settings::Settings;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f64 = 0.1;

/// Sends a prompt to a model and returns the raw completion text
pub trait CompletionClient {
    fn complete(&self, model: &Model, prompt: &str) -> Result<String, ExecutionError>;
}

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, ...
pub fn retry_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.pow(attempt.saturating_sub(1))
}

fn is_retriable_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

fn chat_request_body(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE,
    })
}

fn inference_request_body(prompt: &str) -> Value {
    json!({
        "inputs": prompt,
        "parameters": {
            "max_new_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "return_full_text": false,
        },
    })
}

/// `choices[0].message.content` of an OpenAI-style chat completion
fn extract_chat_content(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `[0].generated_text` or `.generated_text` of a text-generation response
fn extract_generated_text(body: &Value) -> Option<String> {
    body.pointer("/0/generated_text")
        .or_else(|| body.get("generated_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Talks to Together.ai (chat completions) and Hugging Face (text generation).
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    settings: Settings,
}

impl HttpCompletionClient {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn http(&self) -> Result<Client, ExecutionError> {
        Client::builder()
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|e| ExecutionError::Http(e.to_string()))
    }

    fn credential(&self, provider: Provider) -> Result<&str, ExecutionError> {
        let token = match provider {
            Provider::Together => self.settings.together_api_key.as_deref(),
            Provider::HuggingFace => self.settings.huggingface_token.as_deref(),
        };
        token.ok_or(ExecutionError::MissingCredentials(provider))
    }

    /// Sends the request up to three times. Timeouts, connection failures,
    /// 408, 429 and 5xx are retried; anything else fails immediately.
    fn send_with_retry(
        &self,
        provider: Provider,
        request: impl Fn() -> RequestBuilder,
    ) -> Result<Value, ExecutionError> {
        let mut attempt = 1;
        loop {
            let (error, retriable) = match request().send() {
                Ok(response) if response.status().is_success() => {
                    return response.json::<Value>().map_err(|e| ExecutionError::InvalidResponse {
                        provider,
                        details: e.to_string(),
                    });
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().unwrap_or_default();
                    let error = ExecutionError::Http(format!("{} returned {}: {}", provider, status, body.trim()));
                    (error, is_retriable_status(status))
                }
                Err(e) => {
                    let retriable = e.is_timeout() || e.is_connect();
                    (ExecutionError::Http(e.to_string()), retriable)
                }
            };

            if !retriable || attempt == MAX_ATTEMPTS {
                return Err(error);
            }

            let delay = retry_delay(attempt);
            warn!("{} (attempt {}/{}), retrying in {:?}", error, attempt, MAX_ATTEMPTS, delay);
            thread::sleep(delay);
            attempt += 1;
        }
    }

    fn complete_together(&self, model: &str, prompt: &str) -> Result<String, ExecutionError> {
        let token = self.credential(Provider::Together)?;
        let client = self.http()?;
        let url = format!("{}/chat/completions", self.settings.together_base_url);
        let body = chat_request_body(model, prompt);

        let response = self.send_with_retry(Provider::Together, || {
            client.post(&url).bearer_auth(token).json(&body)
        })?;

        extract_chat_content(&response).ok_or_else(|| ExecutionError::InvalidResponse {
            provider: Provider::Together,
            details: "missing choices[0].message.content".to_string(),
        })
    }

    fn complete_huggingface(&self, model: &str, prompt: &str) -> Result<String, ExecutionError> {
        let token = self.credential(Provider::HuggingFace)?;
        let client = self.http()?;
        let url = format!("{}/{}", self.settings.huggingface_base_url, model);
        let body = inference_request_body(prompt);

        let response = self.send_with_retry(Provider::HuggingFace, || {
            client.post(&url).bearer_auth(token).json(&body)
        })?;

        extract_generated_text(&response).ok_or_else(|| ExecutionError::InvalidResponse {
            provider: Provider::HuggingFace,
            details: "missing generated_text".to_string(),
        })
    }

    /// Checks the Together.ai key with a single `GET /models`.
    pub fn verify_credentials(&self) -> Result<(), ExecutionError> {
        let token = self.credential(Provider::Together)?;
        let url = format!("{}/models", self.settings.together_base_url);

        let response = self
            .http()?
            .get(&url)
            .bearer_auth(token)
            .send()
            .map_err(|e| ExecutionError::Http(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ExecutionError::Http(format!("{} returned {}", Provider::Together, response.status())))
        }
    }
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, model: &Model, prompt: &str) -> Result<String, ExecutionError> {
        debug!("Prompt for {} is {} bytes", model.name, prompt.len());
        match model.provider {
            Provider::Together => self.complete_together(&model.name, prompt),
            Provider::HuggingFace => self.complete_huggingface(&model.name, prompt),
        }
    }
}
