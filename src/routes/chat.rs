use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{AppError, EMPTY_MESSAGE, MISSING_MESSAGE},
    message::{ChatRequest, ChatResponse, HealthResponse},
    services::chatbot::generate_reply,
    state::SharedState,
};

#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let message = parse_message(&body)?;
    info!("Received message: {}", message);

    let trimmed = message.trim();
    if trimmed.is_empty() {
        info!("rejecting empty message");
        return Err(AppError::BadRequest(EMPTY_MESSAGE.to_string()));
    }

    match generate_reply(state.provider.as_ref(), &state.config.chat, trimmed).await {
        Ok(reply) => {
            info!("API response: {}", reply);
            Ok(Json(ChatResponse { reply }))
        }
        Err(e) => {
            let detail = state.config.api_key.redact(&e.to_string());
            error!("completion provider call failed: {}", detail);
            Err(AppError::Upstream(format!("Completion provider error: {detail}")))
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Pull the `message` string out of a raw body. The content type is not checked.
fn parse_message(body: &[u8]) -> Result<String, AppError> {
    let missing = || {
        info!("request body has no 'message' field");
        AppError::BadRequest(MISSING_MESSAGE.to_string())
    };

    // Only a JSON object counts; serde would otherwise accept `["text"]` as a struct.
    let object = match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => value,
        _ => return Err(missing()),
    };

    serde_json::from_value::<ChatRequest>(object)
        .ok()
        .and_then(|req| req.message)
        .ok_or_else(missing)
}
