//! Locating the image inside a chat-completion envelope.
//!
//! Gateways return images in several shapes. Each extractor handles one of
//! them; they run in order and the first hit wins.

use llmapi::providers::openai::{ChatContent, ChatContentPart, InlineData};
use llmapi::utils::{data_uri, is_data_uri, is_http_url};
use llmapi::{ChatCompletionResponse, ChatMessage};

use crate::constants::DEFAULT_IMAGE_MIME;

pub type Extractor = fn(&ChatMessage) -> Option<String>;

pub const EXTRACTORS: [Extractor; 4] = [
    content_image_part,
    content_inline_data,
    content_string,
    parts_inline_data,
];

pub fn extract_image_url(response: &ChatCompletionResponse) -> Option<String> {
    let message = response.first_message()?;
    EXTRACTORS.iter().find_map(|extractor| extractor(message))
}

/// `content: [{ "type": "image", "image_url": { "url": ... } }]`
pub fn content_image_part(message: &ChatMessage) -> Option<String> {
    content_parts(message)?
        .iter()
        .filter(|part| part.kind.as_deref() == Some("image"))
        .filter_map(|part| part.image_url.as_ref()?.url.as_deref())
        .map(str::trim)
        .find(|url| is_image_reference(url))
        .map(str::to_string)
}

/// `content: [{ "inline_data": { "mime_type": ..., "data": ... } }]`
pub fn content_inline_data(message: &ChatMessage) -> Option<String> {
    first_inline_data(content_parts(message)?)
}

/// `content: "https://..."` or `content: "data:image/png;base64,..."`
pub fn content_string(message: &ChatMessage) -> Option<String> {
    match &message.content {
        Some(ChatContent::Text(text)) => {
            let text = text.trim();
            is_image_reference(text).then(|| text.to_string())
        }
        _ => None,
    }
}

/// `parts: [{ "inline_data": { "mime_type": ..., "data": ... } }]`
pub fn parts_inline_data(message: &ChatMessage) -> Option<String> {
    first_inline_data(message.parts.as_deref()?)
}

fn content_parts(message: &ChatMessage) -> Option<&[ChatContentPart]> {
    match &message.content {
        Some(ChatContent::Parts(parts)) => Some(parts.as_slice()),
        _ => None,
    }
}

fn first_inline_data(parts: &[ChatContentPart]) -> Option<String> {
    parts
        .iter()
        .filter_map(|part| part.inline_data.as_ref())
        .find_map(inline_data_uri)
}

fn inline_data_uri(inline_data: &InlineData) -> Option<String> {
    let data = inline_data.data.as_deref().map(str::trim).unwrap_or_default();
    if data.is_empty() {
        return None;
    }

    let mime_type = inline_data
        .mime_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME);

    Some(data_uri(mime_type, data))
}

fn is_image_reference(value: &str) -> bool {
    is_http_url(value) || is_data_uri(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn response(message: Value) -> ChatCompletionResponse {
        serde_json::from_value(json!({ "choices": [{ "message": message }] }))
            .expect("valid envelope")
    }

    fn response_with_parts(parts: Value) -> ChatCompletionResponse {
        response(json!({ "content": null, "parts": parts }))
    }

    #[test]
    fn content_image_part_url() {
        let response = response(json!({
            "content": [
                { "type": "text", "text": "here you go" },
                { "type": "image", "image_url": { "url": "https://cdn.example.com/a.png" } }
            ]
        }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[test]
    fn inline_data_becomes_data_uri() {
        let response = response(json!({
            "content": [{ "inline_data": { "mime_type": "image/webp", "data": "UklGR" } }]
        }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("data:image/webp;base64,UklGR")
        );
    }

    #[test]
    fn camel_case_inline_data_is_accepted() {
        let response = response(json!({
            "content": [{ "inlineData": { "mimeType": "image/jpeg", "data": "AQID" } }]
        }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("data:image/jpeg;base64,AQID")
        );
    }

    #[test]
    fn missing_mime_type_defaults_to_png() {
        let response = response(json!({ "parts": [{ "inline_data": { "data": "AQID" } }] }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("data:image/png;base64,AQID")
        );
    }

    #[test]
    fn null_mime_type_defaults_to_png() {
        let response = response(json!({
            "parts": [{ "inline_data": { "mime_type": null, "data": "AQID" } }]
        }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("data:image/png;base64,AQID")
        );
    }

    #[test]
    fn odd_part_does_not_hide_its_neighbour() {
        let response = response(json!({
            "content": [
                { "type": "image", "image_url": "https://cdn.example.com/x.png" },
                "stray text",
                { "inline_data": { "mime_type": "image/png", "data": "AQID" } }
            ]
        }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("data:image/png;base64,AQID")
        );

        let sibling = response_with_parts(json!([
            { "inline_data": 42 },
            { "inlineData": { "mimeType": "image/webp", "data": "UklGR" } }
        ]));
        assert_eq!(
            extract_image_url(&sibling).as_deref(),
            Some("data:image/webp;base64,UklGR")
        );
    }

    #[test]
    fn content_string_url_or_data_uri() {
        let url = response(json!({ "content": "https://cdn.example.com/b.png" }));
        assert_eq!(
            extract_image_url(&url).as_deref(),
            Some("https://cdn.example.com/b.png")
        );

        let data = response(json!({ "content": "data:image/png;base64,AQID" }));
        assert_eq!(
            extract_image_url(&data).as_deref(),
            Some("data:image/png;base64,AQID")
        );
    }

    #[test]
    fn plain_text_content_falls_through_to_parts() {
        let response = response(json!({
            "content": "Here is your image.",
            "parts": [
                { "text": "ignored" },
                { "inline_data": { "mime_type": "image/png", "data": "AQID" } }
            ]
        }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("data:image/png;base64,AQID")
        );
    }

    #[test]
    fn image_part_beats_earlier_inline_data() {
        let response = response(json!({
            "content": [
                { "inline_data": { "mime_type": "image/png", "data": "AQID" } },
                { "type": "image", "image_url": { "url": "https://cdn.example.com/c.png" } }
            ]
        }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("https://cdn.example.com/c.png")
        );
    }

    #[test]
    fn content_beats_sibling_parts() {
        let response = response(json!({
            "content": "https://cdn.example.com/d.png",
            "parts": [{ "inline_data": { "mime_type": "image/png", "data": "AQID" } }]
        }));
        assert_eq!(
            extract_image_url(&response).as_deref(),
            Some("https://cdn.example.com/d.png")
        );
    }

    #[test]
    fn nothing_recognisable() {
        assert!(extract_image_url(&response(json!({ "content": "Sorry, I can't do that." }))).is_none());
        assert!(extract_image_url(&response(json!({ "content": [{ "type": "text", "text": "no" }] }))).is_none());
        assert!(extract_image_url(&response(json!({ "content": [{ "inline_data": { "data": "" } }] }))).is_none());
        assert!(extract_image_url(&ChatCompletionResponse::default()).is_none());
    }
}
