use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayload {
    pub prompt: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub image_url: Option<String>,
    pub image_base64: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpscalePayload {
    #[serde(flatten)]
    pub image: ImagePayload,
    /// Raw value; `Scale::from_request` decides what counts as a scale.
    pub scale: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTransferPayload {
    #[serde(flatten)]
    pub image: ImagePayload,
    pub style: Option<String>,
    pub custom_style: Option<String>,
}

/// Success body. Exactly one of the echoed metadata fields is set,
/// depending on the operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub success: bool,
    pub image_url: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_styles: Option<Vec<&'static str>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            available_endpoints: None,
            available_styles: None,
        }
    }
}
