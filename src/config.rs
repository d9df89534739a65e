use std::net::SocketAddr;

use clap::Parser;

use crate::constants::{
    DEFAULT_EDIT_MODEL, DEFAULT_GATEWAY_URL, DEFAULT_GENERATE_MODEL, DEFAULT_LISTEN_ADDR,
    DEFAULT_MAX_BODY_BYTES,
};

/// Proxy that turns image operations into chat-completion calls on an AI gateway.
#[derive(Debug, Clone, Parser)]
#[command(name = "image-proxy", version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "IMAGE_PROXY_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,

    /// Base URL of the OpenAI-compatible gateway (without `/chat/completions`)
    #[arg(long, env = "AI_GATEWAY_URL", default_value = DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,

    /// Key used upstream. When unset, the caller's own key is forwarded.
    #[arg(long, env = "AI_GATEWAY_API_KEY", hide_env_values = true)]
    pub gateway_api_key: Option<String>,

    /// Model used for text-to-image generation
    #[arg(long, env = "GENERATE_MODEL", default_value = DEFAULT_GENERATE_MODEL)]
    pub generate_model: String,

    /// Vision model used for background removal, upscaling and style transfer
    #[arg(long, env = "EDIT_MODEL", default_value = DEFAULT_EDIT_MODEL)]
    pub edit_model: String,

    /// Largest accepted request body in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Emit logs as JSON lines
    #[arg(long, env = "JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.gateway_url.clone(),
            api_key: self
                .gateway_api_key
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            generate_model: self.generate_model.clone(),
            edit_model: self.edit_model.clone(),
        }
    }
}

/// Upstream settings handed to the dispatcher.
#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub generate_model: String,
    pub edit_model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            api_key: None,
            generate_model: DEFAULT_GENERATE_MODEL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("generate_model", &self.generate_model)
            .field("edit_model", &self.edit_model)
            .finish()
    }
}
