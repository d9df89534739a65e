mod commands;
mod constants;
mod models;
mod styles;

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod operations;
pub mod server;

pub use commands::auth::extract_credential;

pub use constants::{
    DEFAULT_EDIT_MODEL, DEFAULT_GATEWAY_URL, DEFAULT_GENERATE_MODEL, DEFAULT_IMAGE_MIME,
    DEFAULT_LISTEN_ADDR, DEFAULT_MAX_BODY_BYTES, MIN_API_KEY_LEN,
};

pub use config::{Config, GatewayConfig};
pub use dispatcher::Dispatcher;
pub use error::ApiError;
pub use extract::extract_image_url;
pub use models::{ErrorBody, OperationResult};
pub use operations::{Endpoint, ImageReference, Operation, Scale, StyleChoice, UpstreamPlan};
pub use server::{router, router_with_limit, serve, AppState};
pub use styles::{available_styles, preset_instruction};
