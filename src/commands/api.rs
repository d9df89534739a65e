use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::commands::auth::extract_credential;
use crate::error::ApiError;
use crate::models::OperationResult;
use crate::operations::Endpoint;
use crate::server::AppState;

/// POST /api - consolidated dispatcher keyed by the body's `endpoint` field.
pub async fn dispatch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OperationResult>, ApiError> {
    let credential = extract_credential(&headers)?;
    let body = parse_body(&body?)?;
    let result = state.dispatcher.dispatch(&credential, body).await;
    respond(result)
}

pub async fn generate_image(
    state: State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OperationResult>, ApiError> {
    run_endpoint(state, headers, body, Endpoint::Generate).await
}

pub async fn remove_background(
    state: State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OperationResult>, ApiError> {
    run_endpoint(state, headers, body, Endpoint::RemoveBackground).await
}

pub async fn upscale(
    state: State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OperationResult>, ApiError> {
    run_endpoint(state, headers, body, Endpoint::Upscale).await
}

pub async fn style_transfer(
    state: State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OperationResult>, ApiError> {
    run_endpoint(state, headers, body, Endpoint::StyleTransfer).await
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn run_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
    endpoint: Endpoint,
) -> Result<Json<OperationResult>, ApiError> {
    let credential = extract_credential(&headers)?;
    let mut payload = parse_body(&body?)?;
    // The path already names the operation.
    if let Some(fields) = payload.as_object_mut() {
        fields.remove("endpoint");
    }
    let result = state.dispatcher.run(&credential, endpoint, payload).await;
    respond(result)
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::InvalidJson(err.to_string()))
}

fn respond(result: Result<OperationResult, ApiError>) -> Result<Json<OperationResult>, ApiError> {
    match result {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            if err.status().is_server_error() {
                error!(error = %err, "image operation failed");
            } else {
                warn!(error = %err, status = err.status().as_u16(), "image operation rejected");
            }
            Err(err)
        }
    }
}
