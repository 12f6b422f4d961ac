//! Trigger endpoints. The queue trigger (or anything standing in for it)
//! POSTs the event here; the answer is always `200 {"statusCode": 200}`.

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use vidrelay_core::HandlerResponse;

use crate::state::AppState;

/// Decode a request body into a JSON value, tolerating garbage.
fn parse_payload(handler: &'static str, body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return Some(Value::Null);
    }

    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(handler, error = %e, bytes = body.len(), "Ignoring non-JSON trigger body");
            None
        }
    }
}

pub async fn receiver(State(state): State<Arc<AppState>>, body: Bytes) -> Json<HandlerResponse> {
    let response = match parse_payload("receiver", &body) {
        Some(payload) => state.receiver().handle_value(payload).await,
        None => HandlerResponse::ok(),
    };
    Json(response)
}

pub async fn downloader(State(state): State<Arc<AppState>>, body: Bytes) -> Json<HandlerResponse> {
    let response = match parse_payload("downloader", &body) {
        Some(payload) => state.downloader().handle_value(payload).await,
        None => HandlerResponse::ok(),
    };
    Json(response)
}
