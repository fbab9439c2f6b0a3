//! Registration, login and profile routes.

use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::Role;
use crate::domains::auth::{hash_password, verify_password, Profile};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::MaybeUser;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    full_name: Option<String>,
    phone: Option<String>,
    role: Option<Role>,
}

async fn register(
    Extension(state): Extension<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }
    if body.password.len() < 6 {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let email = body.email.trim().to_lowercase();

    if Profile::find_by_email(&email, &state.db_pool).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    // Admin accounts are provisioned out of band, never self-registered
    let role = match body.role.unwrap_or(Role::Citizen) {
        Role::Admin => return Err(ApiError::BadRequest("Invalid role".to_string())),
        role => role,
    };

    let now = Utc::now();
    let profile = Profile {
        id: Uuid::now_v7(),
        email,
        password_hash: hash_password(&body.password)?,
        full_name: body.full_name,
        phone: body.phone,
        address: None,
        avatar_url: None,
        role: role.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };

    let profile = profile.insert(&state.db_pool).await?;

    let token = state
        .jwt_service
        .create_token(profile.id, profile.email.clone(), role)?;

    tracing::info!(user_id = %profile.id, role = %role, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful",
            "token": token,
            "user": profile.public(),
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    Extension(state): Extension<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let email = body.email.trim().to_lowercase();

    let profile = Profile::find_by_email(&email, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(&body.password, &profile.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let role = profile
        .role
        .parse::<Role>()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;

    let token = state
        .jwt_service
        .create_token(profile.id, profile.email.clone(), role)?;

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "user": profile.public(),
    })))
}

async fn me(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
) -> ApiResult<Json<Value>> {
    let user = auth.require()?;
    let profile = Profile::find_by_id(user.user_id, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "user": profile.public() })))
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    full_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    avatar_url: Option<String>,
}

async fn update_profile(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Value>> {
    let user = auth.require()?;

    let profile = Profile::update_details(
        user.user_id,
        body.full_name,
        body.phone,
        body.address,
        body.avatar_url,
        &state.db_pool,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated",
        "user": profile.public(),
    })))
}
