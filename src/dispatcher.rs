use llmapi::{send_chat_completion, LLMClient, LLMError, LLMMessage, LLMMessageType};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::error::ApiError;
use crate::extract::extract_image_url;
use crate::models::OperationResult;
use crate::operations::{Endpoint, Operation, StyleChoice};

/// Validates an operation, makes the one upstream call and shapes the result.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    config: GatewayConfig,
    http: Client,
}

impl Dispatcher {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Consolidated entry point: `endpoint` selects the operation and the
    /// remaining fields are its payload.
    pub async fn dispatch(
        &self,
        credential: &str,
        mut body: Value,
    ) -> Result<OperationResult, ApiError> {
        let endpoint = match body.as_object_mut().and_then(|fields| fields.remove("endpoint")) {
            Some(Value::String(name)) => name.parse::<Endpoint>()?,
            Some(other) => return Err(ApiError::UnknownEndpoint(other.to_string())),
            None => return Err(ApiError::UnknownEndpoint(String::new())),
        };

        self.run(credential, endpoint, body).await
    }

    pub async fn run(
        &self,
        credential: &str,
        endpoint: Endpoint,
        payload: Value,
    ) -> Result<OperationResult, ApiError> {
        if !payload.is_object() {
            return Err(ApiError::validation("Request body must be a JSON object"));
        }

        let operation = Operation::from_payload(endpoint, payload)?;
        let plan = operation.plan(&self.config);
        info!(%endpoint, model = %plan.model, "dispatching image operation");

        let mut content = vec![LLMMessageType::text(plan.instruction.clone())];
        if let Some(image) = &plan.image {
            content.push(LLMMessageType::image(image.as_str()));
        }

        let client = LLMClient::new(
            self.upstream_key(credential),
            self.config.base_url.clone(),
            plan.model.clone(),
        )
        .with_http_client(self.http.clone());

        let response = send_chat_completion(&client, vec![LLMMessage::user(content)])
            .await
            .map_err(|err| {
                match &err {
                    LLMError::Status { .. } => {}
                    LLMError::Decode { body, .. } => {
                        warn!(%endpoint, error = %err, body = %body, "undecodable gateway response")
                    }
                    LLMError::Request(_) => warn!(%endpoint, error = %err, "gateway unreachable"),
                }
                ApiError::from(err)
            })?;

        let Some(image_url) = extract_image_url(&response) else {
            debug!(%endpoint, response = ?response, "no image in gateway response");
            return Err(ApiError::Extraction(endpoint));
        };

        Ok(build_result(&operation, plan.instruction, image_url))
    }

    fn upstream_key<'a>(&'a self, credential: &'a str) -> &'a str {
        self.config.api_key.as_deref().unwrap_or(credential)
    }
}

fn build_result(operation: &Operation, instruction: String, image_url: String) -> OperationResult {
    let mut result = OperationResult {
        success: true,
        image_url,
        endpoint: operation.endpoint().as_str().to_string(),
        prompt: None,
        scale: None,
        style: None,
    };

    match operation {
        Operation::Generate { .. } => result.prompt = Some(instruction),
        Operation::RemoveBackground { .. } => {}
        Operation::Upscale { scale, .. } => result.scale = Some(scale.factor()),
        Operation::StyleTransfer { style, .. } => {
            result.style = Some(match style {
                StyleChoice::Preset(style) => style.clone(),
                StyleChoice::Custom { style, .. } => {
                    style.clone().unwrap_or_else(|| "custom".to_string())
                }
            })
        }
    }

    result
}
