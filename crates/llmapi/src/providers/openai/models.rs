use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: ChatMessage,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<ChatContent>,
    /// Gemini-flavoured gateways put inline images beside `content`.
    #[serde(default, deserialize_with = "lenient_optional_parts")]
    pub parts: Option<Vec<ChatContentPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChatContent {
    Text(String),
    Parts(#[serde(deserialize_with = "lenient_parts")] Vec<ChatContentPart>),
    Other(serde_json::Value),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatContentPart {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
    pub image_url: Option<ChatContentImageUrl>,
    #[serde(alias = "inlineData")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatContentImageUrl {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InlineData {
    #[serde(alias = "mimeType")]
    pub mime_type: Option<String>,
    pub data: Option<String>,
}

/// Parts that do not match the expected shape are dropped one by one so a
/// single odd entry cannot hide the image next to it.
fn lenient_parts<'de, D>(deserializer: D) -> Result<Vec<ChatContentPart>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

fn lenient_optional_parts<'de, D>(deserializer: D) -> Result<Option<Vec<ChatContentPart>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}
