use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{ChatError, Message};
use crate::providers::http_errors::chat_request_error;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Builds the shared HTTP client. Certificate verification stays on unless
/// the config explicitly opts out.
pub fn build_client(cfg: &Config) -> reqwest::Result<Client> {
    if cfg.accept_invalid_certs {
        warn!(
            api_url = %cfg.api_url,
            "TLS certificate verification is disabled by DEEPSEEK_ACCEPT_INVALID_CERTS"
        );
    }

    Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .danger_accept_invalid_certs(cfg.accept_invalid_certs)
        .build()
}

fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessage<'_>> {
    messages
        .iter()
        .map(|msg| ChatMessage {
            role: msg.role.as_str(),
            content: &msg.content,
        })
        .collect()
}

/// Returns the first choice's text; any further choices are dropped.
fn extract_reply(body: &str) -> Result<String, ChatError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body).map_err(ChatError::Parse)?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(ChatError::EmptyResponse)
}

pub async fn chat(
    client: &Client,
    cfg: &Config,
    messages: &[Message],
) -> Result<String, ChatError> {
    let api_key = cfg.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;

    let body = ChatCompletionRequest {
        model: &cfg.model,
        messages: to_chat_messages(messages),
    };
    debug!(
        api_url = %cfg.api_url,
        model = %cfg.model,
        message_count = messages.len(),
        "sending chat completion request"
    );

    let response = client
        .post(&cfg.api_url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            warn!(
                api_url = %cfg.api_url,
                model = %cfg.model,
                error = %err,
                "chat completion request failed"
            );
            chat_request_error(err, &cfg.api_url, cfg.request_timeout_secs)
        })?;

    let status = response.status();
    let response_body = response
        .text()
        .await
        .map_err(|err| chat_request_error(err, &cfg.api_url, cfg.request_timeout_secs))?;

    if status != StatusCode::OK {
        warn!(
            api_url = %cfg.api_url,
            model = %cfg.model,
            status = %status,
            response_body_len = response_body.len(),
            "chat API returned non-success status"
        );
        return Err(ChatError::Api {
            status: status.as_u16(),
            body: response_body,
        });
    }

    let reply = extract_reply(&response_body)?;
    debug!(
        model = %cfg.model,
        response_len = reply.len(),
        "received chat completion response"
    );
    Ok(reply)
}
