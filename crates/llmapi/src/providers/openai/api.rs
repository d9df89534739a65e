use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{LLMError, Result};
use crate::types::{LLMClient, LLMMessage, LLMMessageType};

use super::models::ChatCompletionResponse;

/// Sends one chat-completion request and decodes the envelope.
///
/// No retry is attempted: a repeated call may be billed again upstream, so
/// the decision to resubmit is left to the caller.
pub async fn send_chat_completion(
    client: &LLMClient,
    messages: Vec<LLMMessage>,
) -> Result<ChatCompletionResponse> {
    let url = format!(
        "{}/chat/completions",
        client.endpoint().trim_end_matches('/')
    );
    let payload = json!({
        "model": client.default_model(),
        "messages": convert_messages_to_openai(messages),
    });

    debug!(model = client.default_model(), "sending chat completion");

    let response = client
        .http()
        .post(url)
        .bearer_auth(client.api_key())
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        warn!(status = status.as_u16(), body = %response_text, "gateway returned an error");
        return Err(LLMError::Status {
            status: status.as_u16(),
            body: response_text,
        });
    }

    serde_json::from_str(&response_text).map_err(|source| LLMError::Decode {
        source,
        body: response_text,
    })
}

fn convert_messages_to_openai(messages: Vec<LLMMessage>) -> Vec<Value> {
    messages.into_iter().map(convert_message).collect()
}

/// Text-only messages collapse to a plain string; anything carrying an
/// image becomes an ordered list of typed parts.
pub fn convert_message(message: LLMMessage) -> Value {
    let role = message.role.as_openai_role();

    let mut content_items = Vec::new();
    let mut text_segments = Vec::new();
    let mut only_text = true;

    for part in message.content {
        match part {
            LLMMessageType::TEXT(text) => {
                text_segments.push(text.clone());
                content_items.push(json!({
                    "type": "text",
                    "text": text
                }));
            }
            LLMMessageType::IMAGE { url } => {
                only_text = false;
                content_items.push(json!({
                    "type": "image_url",
                    "image_url": { "url": url }
                }));
            }
        }
    }

    if content_items.is_empty() {
        return json!({
            "role": role,
            "content": ""
        });
    }

    if only_text {
        let joined = text_segments.join("\n");
        json!({
            "role": role,
            "content": joined
        })
    } else {
        json!({
            "role": role,
            "content": content_items
        })
    }
}
