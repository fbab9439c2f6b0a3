//! Public contact form route.

use axum::{extract::Extension, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::domains::contact::ContactMessage;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

pub fn router() -> Router {
    Router::new().route("/", post(submit))
}

#[derive(Debug, Deserialize)]
struct ContactRequest {
    name: String,
    email: String,
    message: String,
}

async fn submit(
    Extension(state): Extension<AppState>,
    Json(body): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.message.trim().is_empty()
    {
        return Err(ApiError::BadRequest(
            "Name, email, and message are required.".to_string(),
        ));
    }

    let message = ContactMessage {
        id: Uuid::now_v7(),
        name: body.name,
        email: body.email,
        message: body.message,
        created_at: Utc::now(),
    };

    let message = message.insert(&state.db_pool).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Message sent successfully!",
            "contact": message,
        })),
    ))
}
