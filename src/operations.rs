//! Request validation and the mapping from an operation to the upstream call.

use std::fmt;
use std::str::FromStr;

use llmapi::utils::{data_uri, is_base64_payload, is_data_uri, is_http_url};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::constants::DEFAULT_IMAGE_MIME;
use crate::error::ApiError;
use crate::models::{GeneratePayload, ImagePayload, StyleTransferPayload, UpscalePayload};
use crate::styles::preset_instruction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Generate,
    RemoveBackground,
    Upscale,
    StyleTransfer,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Generate,
        Endpoint::RemoveBackground,
        Endpoint::Upscale,
        Endpoint::StyleTransfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Generate => "generate",
            Endpoint::RemoveBackground => "remove-background",
            Endpoint::Upscale => "upscale",
            Endpoint::StyleTransfer => "style-transfer",
        }
    }

    pub(crate) fn failure_verb(&self) -> &'static str {
        match self {
            Endpoint::Generate => "generate image",
            Endpoint::RemoveBackground => "remove background",
            Endpoint::Upscale => "upscale image",
            Endpoint::StyleTransfer => "apply style transfer",
        }
    }
}

impl FromStr for Endpoint {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.as_str() == value)
            .ok_or_else(|| ApiError::UnknownEndpoint(value.to_string()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-supplied image, already normalised to something the gateway
/// accepts as an `image_url`.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageReference {
    Url(String),
    DataUri(String),
}

impl ImageReference {
    pub fn as_str(&self) -> &str {
        match self {
            ImageReference::Url(url) | ImageReference::DataUri(url) => url,
        }
    }

    /// `imageUrl` wins when both fields are present.
    fn from_payload(payload: ImagePayload) -> Result<Self, ApiError> {
        if let Some(url) = non_blank(payload.image_url) {
            return Self::parse(&url).ok_or_else(|| {
                ApiError::validation("imageUrl must be an absolute http(s) URL or a data URI")
            });
        }

        if let Some(data) = non_blank(payload.image_base64) {
            if let Some(reference) = Self::parse(&data) {
                return Ok(reference);
            }
            if is_base64_payload(&data) {
                return Ok(ImageReference::DataUri(data_uri(DEFAULT_IMAGE_MIME, &data)));
            }
            return Err(ApiError::validation(
                "imageBase64 must be a base64 data URI or base64-encoded image data",
            ));
        }

        Err(ApiError::validation("imageUrl or imageBase64 is required"))
    }

    fn parse(value: &str) -> Option<Self> {
        if is_data_uri(value) {
            return Some(ImageReference::DataUri(value.to_string()));
        }
        if is_http_url(value) && Url::parse(value).is_ok() {
            return Some(ImageReference::Url(value.to_string()));
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    X2,
    X4,
}

impl Scale {
    fn from_request(scale: Option<&Value>) -> Result<Self, ApiError> {
        match scale {
            None | Some(Value::Null) => Ok(Scale::X2),
            Some(value) => match value.as_f64() {
                Some(factor) if factor == 2.0 => Ok(Scale::X2),
                Some(factor) if factor == 4.0 => Ok(Scale::X4),
                _ => Err(ApiError::validation("scale must be 2 or 4")),
            },
        }
    }

    pub fn factor(&self) -> u32 {
        match self {
            Scale::X2 => 2,
            Scale::X4 => 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StyleChoice {
    Preset(String),
    /// Free-text instruction; `style` is kept only for echoing back.
    Custom {
        instruction: String,
        style: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Generate {
        prompt: String,
        style: Option<String>,
    },
    RemoveBackground {
        image: ImageReference,
    },
    Upscale {
        image: ImageReference,
        scale: Scale,
    },
    StyleTransfer {
        image: ImageReference,
        style: StyleChoice,
    },
}

/// Everything needed for the single upstream call.
#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamPlan {
    pub instruction: String,
    pub model: String,
    pub image: Option<ImageReference>,
}

impl Operation {
    pub fn from_payload(endpoint: Endpoint, payload: Value) -> Result<Self, ApiError> {
        match endpoint {
            Endpoint::Generate => {
                let GeneratePayload { prompt, style } = decode(payload)?;
                let prompt =
                    non_blank(prompt).ok_or_else(|| ApiError::validation("Prompt is required"))?;
                Ok(Operation::Generate {
                    prompt,
                    style: non_blank(style),
                })
            }
            Endpoint::RemoveBackground => {
                let payload: ImagePayload = decode(payload)?;
                Ok(Operation::RemoveBackground {
                    image: ImageReference::from_payload(payload)?,
                })
            }
            Endpoint::Upscale => {
                let UpscalePayload { image, scale } = decode(payload)?;
                let image = ImageReference::from_payload(image)?;
                Ok(Operation::Upscale {
                    image,
                    scale: Scale::from_request(scale.as_ref())?,
                })
            }
            Endpoint::StyleTransfer => {
                let StyleTransferPayload {
                    image,
                    style,
                    custom_style,
                } = decode(payload)?;
                let image = ImageReference::from_payload(image)?;
                let style = match (non_blank(custom_style), non_blank(style)) {
                    (Some(instruction), style) => StyleChoice::Custom { instruction, style },
                    (None, Some(style)) => StyleChoice::Preset(style),
                    (None, None) => return Err(ApiError::missing_style()),
                };
                Ok(Operation::StyleTransfer { image, style })
            }
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Operation::Generate { .. } => Endpoint::Generate,
            Operation::RemoveBackground { .. } => Endpoint::RemoveBackground,
            Operation::Upscale { .. } => Endpoint::Upscale,
            Operation::StyleTransfer { .. } => Endpoint::StyleTransfer,
        }
    }

    pub fn plan(&self, config: &GatewayConfig) -> UpstreamPlan {
        match self {
            Operation::Generate { prompt, style } => UpstreamPlan {
                instruction: generate_instruction(prompt, style.as_deref()),
                model: config.generate_model.clone(),
                image: None,
            },
            Operation::RemoveBackground { image } => UpstreamPlan {
                instruction: "Remove the background from this image completely. Make the background fully transparent or white. Keep only the main subject with clean, precise edges. Return only the processed image.".to_string(),
                model: config.edit_model.clone(),
                image: Some(image.clone()),
            },
            Operation::Upscale { image, scale } => UpstreamPlan {
                instruction: format!(
                    "Upscale this image to {}x its original resolution. Enhance details, improve sharpness, and maintain high quality. Return only the upscaled image.",
                    scale.factor()
                ),
                model: config.edit_model.clone(),
                image: Some(image.clone()),
            },
            Operation::StyleTransfer { image, style } => UpstreamPlan {
                instruction: format!("{} Return only the transformed image.", style_instruction(style)),
                model: config.edit_model.clone(),
                image: Some(image.clone()),
            },
        }
    }
}

fn generate_instruction(prompt: &str, style: Option<&str>) -> String {
    match style {
        Some(style) => format!("{prompt}, {style} style, highly detailed, professional quality"),
        None => format!("{prompt}, highly detailed, professional quality, 4k resolution"),
    }
}

fn style_instruction(choice: &StyleChoice) -> String {
    match choice {
        StyleChoice::Custom { instruction, .. } => instruction.clone(),
        StyleChoice::Preset(style) => preset_instruction(style)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Transform this image into {style} style.")),
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|err| ApiError::validation(err.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> GatewayConfig {
        GatewayConfig {
            base_url: "http://localhost".to_string(),
            api_key: None,
            generate_model: "text-model".to_string(),
            edit_model: "vision-model".to_string(),
        }
    }

    fn plan(endpoint: Endpoint, payload: Value) -> UpstreamPlan {
        Operation::from_payload(endpoint, payload)
            .expect("valid payload")
            .plan(&config())
    }

    #[test]
    fn parses_endpoint_names() {
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.as_str().parse::<Endpoint>().ok(), Some(endpoint));
        }
        assert!(matches!(
            "resize".parse::<Endpoint>(),
            Err(ApiError::UnknownEndpoint(name)) if name == "resize"
        ));
    }

    #[test]
    fn generate_without_style_asks_for_4k() {
        let plan = plan(Endpoint::Generate, json!({ "prompt": "X" }));
        assert_eq!(plan.instruction, "X, highly detailed, professional quality, 4k resolution");
        assert_eq!(plan.model, "text-model");
        assert!(plan.image.is_none());
    }

    #[test]
    fn generate_with_style_appends_it() {
        let plan = plan(Endpoint::Generate, json!({ "prompt": "X", "style": "Y" }));
        assert!(plan.instruction.ends_with("Y style, highly detailed, professional quality"));
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let cases = [
            (Endpoint::Generate, json!({})),
            (Endpoint::Generate, json!({ "prompt": "   " })),
            (Endpoint::RemoveBackground, json!({})),
            (Endpoint::Upscale, json!({ "scale": 4 })),
            (Endpoint::StyleTransfer, json!({ "style": "anime" })),
            (Endpoint::StyleTransfer, json!({ "imageUrl": "https://x/y.jpg" })),
        ];
        for (endpoint, payload) in cases {
            let err = Operation::from_payload(endpoint, payload).expect_err("must be rejected");
            assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn style_transfer_without_style_lists_presets() {
        let err = Operation::from_payload(
            Endpoint::StyleTransfer,
            json!({ "imageUrl": "https://x/y.jpg" }),
        )
        .expect_err("style is required");
        let body = err.to_body();
        assert_eq!(body.error, "style or customStyle is required");
        assert_eq!(body.available_styles.map(|styles| styles.len()), Some(10));
    }

    #[test]
    fn anime_preset_is_selected() {
        let plan = plan(
            Endpoint::StyleTransfer,
            json!({ "imageUrl": "https://x/y.jpg", "style": "anime" }),
        );
        let preset = preset_instruction("anime").expect("anime preset");
        assert_eq!(plan.instruction, format!("{preset} Return only the transformed image."));
        assert_eq!(plan.model, "vision-model");
    }

    #[test]
    fn custom_style_overrides_preset() {
        let plan = plan(
            Endpoint::StyleTransfer,
            json!({ "imageUrl": "https://x/y.jpg", "style": "anime", "customStyle": "Make it look like stained glass." }),
        );
        assert_eq!(
            plan.instruction,
            "Make it look like stained glass. Return only the transformed image."
        );
    }

    #[test]
    fn unknown_style_uses_generic_instruction() {
        let plan = plan(
            Endpoint::StyleTransfer,
            json!({ "imageUrl": "https://x/y.jpg", "style": "baroque" }),
        );
        assert_eq!(
            plan.instruction,
            "Transform this image into baroque style. Return only the transformed image."
        );
    }

    #[test]
    fn upscale_defaults_to_2x() {
        let default = plan(Endpoint::Upscale, json!({ "imageUrl": "https://x/y.jpg" }));
        let explicit = plan(Endpoint::Upscale, json!({ "imageUrl": "https://x/y.jpg", "scale": 2 }));
        assert_eq!(default, explicit);
        assert!(default.instruction.contains("2x"));

        let four = plan(Endpoint::Upscale, json!({ "imageUrl": "https://x/y.jpg", "scale": 4 }));
        assert!(four.instruction.contains("4x"));
    }

    #[test]
    fn upscale_rejects_other_scales() {
        let err = Operation::from_payload(
            Endpoint::Upscale,
            json!({ "imageUrl": "https://x/y.jpg", "scale": 3 }),
        )
        .expect_err("3x is not offered");
        assert_eq!(err.to_string(), "scale must be 2 or 4");
    }

    #[test]
    fn non_numeric_scales_share_the_scale_message() {
        for scale in [json!("4"), json!(-1), json!(true), json!([4])] {
            let err = Operation::from_payload(
                Endpoint::Upscale,
                json!({ "imageUrl": "https://x/y.jpg", "scale": scale }),
            )
            .expect_err("only the numbers 2 and 4 are scales");
            assert_eq!(err.to_string(), "scale must be 2 or 4");
        }

        let null = plan(Endpoint::Upscale, json!({ "imageUrl": "https://x/y.jpg", "scale": null }));
        assert!(null.instruction.contains("2x"));
    }

    #[test]
    fn image_url_takes_precedence() {
        let plan = plan(
            Endpoint::RemoveBackground,
            json!({ "imageUrl": "https://x/y.jpg", "imageBase64": "data:image/png;base64,AQID" }),
        );
        assert_eq!(plan.image, Some(ImageReference::Url("https://x/y.jpg".to_string())));
    }

    #[test]
    fn image_base64_accepts_generated_results() {
        for value in ["data:image/webp;base64,AQID", "https://cdn.example.com/out.png"] {
            let op = Operation::from_payload(Endpoint::RemoveBackground, json!({ "imageBase64": value }))
                .expect("result images are valid inputs");
            assert_eq!(op.plan(&config()).image.map(|i| i.as_str().to_string()), Some(value.to_string()));
        }
    }

    #[test]
    fn bare_base64_is_wrapped() {
        let plan = plan(Endpoint::RemoveBackground, json!({ "imageBase64": "AQID" }));
        assert_eq!(
            plan.image,
            Some(ImageReference::DataUri("data:image/png;base64,AQID".to_string()))
        );
    }

    #[test]
    fn garbage_images_are_rejected() {
        assert!(Operation::from_payload(Endpoint::Upscale, json!({ "imageUrl": "not a url" })).is_err());
        assert!(Operation::from_payload(Endpoint::Upscale, json!({ "imageBase64": "%%%" })).is_err());
    }
}
