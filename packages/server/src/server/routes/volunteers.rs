//! Volunteer registration, directory and leaderboard routes.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::Role;
use crate::domains::volunteers::{normalize_skills, Volunteer};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::MaybeUser;

const DEFAULT_LEADERBOARD_SIZE: i64 = 10;

// Only coordinators may credit a rescue
const RESCUE_CREDIT_ROLES: [Role; 2] = [Role::Ngo, Role::Admin];

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/", get(list))
        .route("/leaderboard", get(leaderboard))
        .route("/:id", get(get_volunteer))
        .route("/:id/availability", put(set_availability))
        .route("/:id/verify", put(verify))
        .route("/:id/complete-rescue", post(complete_rescue))
}

#[derive(Debug, Deserialize)]
struct RegisterVolunteerRequest {
    name: String,
    email: String,
    phone: String,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    // Accepts either a JSON array or a comma-separated string
    skills: Option<serde_json::Value>,
    availability: Option<String>,
    has_vehicle: Option<bool>,
    vehicle_type: Option<String>,
    experience: Option<String>,
    motivation: Option<String>,
}

async fn register(
    Extension(state): Extension<AppState>,
    Json(body): Json<RegisterVolunteerRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    for (field, value) in [
        ("name", &body.name),
        ("email", &body.email),
        ("phone", &body.phone),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("{} is required", field)));
        }
    }

    let now = Utc::now();
    let volunteer = Volunteer {
        id: Uuid::now_v7(),
        name: body.name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        city: body.city,
        state: body.state,
        pincode: body.pincode,
        skills: normalize_skills(body.skills),
        availability: body.availability,
        has_vehicle: body.has_vehicle.unwrap_or(false),
        vehicle_type: body.vehicle_type,
        experience: body.experience,
        motivation: body.motivation,
        is_active: true,
        is_verified: false,
        total_rescues: 0,
        verified_at: None,
        created_at: now,
        updated_at: now,
    };

    let volunteer = volunteer.insert(&state.db_pool).await?;

    tracing::info!(volunteer_id = %volunteer.id, "New volunteer registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Welcome aboard! Thank you for volunteering.",
            "volunteer": volunteer,
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct ListVolunteersQuery {
    city: Option<String>,
    is_active: Option<bool>,
    has_vehicle: Option<bool>,
}

async fn list(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Query(query): Query<ListVolunteersQuery>,
) -> ApiResult<Json<Value>> {
    // Contact details are only for coordinators
    auth.require_role(&[Role::Ngo, Role::Admin])?;

    let volunteers = Volunteer::list(
        query.city.as_deref(),
        query.is_active,
        query.has_vehicle,
        &state.db_pool,
    )
    .await?;

    Ok(Json(json!({ "success": true, "volunteers": volunteers })))
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<i64>,
}

async fn leaderboard(
    Extension(state): Extension<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE).clamp(1, 100);
    let entries = Volunteer::leaderboard(limit, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "leaderboard": entries })))
}

async fn get_volunteer(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Ngo, Role::Admin])?;

    let volunteer = Volunteer::find_by_id(id, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "volunteer": volunteer })))
}

#[derive(Debug, Deserialize)]
struct AvailabilityRequest {
    is_active: bool,
    availability: Option<String>,
}

async fn set_availability(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AvailabilityRequest>,
) -> ApiResult<Json<Value>> {
    auth.require()?;

    let volunteer =
        Volunteer::set_availability(id, body.is_active, body.availability, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Availability updated",
        "volunteer": volunteer,
    })))
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    verified: bool,
}

async fn verify(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<VerifyRequest>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Ngo, Role::Admin])?;

    let volunteer = Volunteer::set_verified(id, body.verified, &state.db_pool).await?;

    tracing::info!(volunteer_id = %volunteer.id, verified = body.verified, "Volunteer verification decision");

    Ok(Json(json!({
        "success": true,
        "message": "Verification updated",
        "volunteer": volunteer,
    })))
}

/// Credit a volunteer with a completed rescue outside the report flow
/// (street rescues that never had a report attached)
async fn complete_rescue(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&RESCUE_CREDIT_ROLES)?;

    let volunteer = Volunteer::increment_rescues(id, &state.db_pool).await?;

    tracing::info!(
        volunteer_id = %volunteer.id,
        total_rescues = volunteer.total_rescues,
        "Rescue credited"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Rescue recorded. Thank you!",
        "volunteer": volunteer,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::middleware::AuthUser;

    fn user_with_role(role: Role) -> MaybeUser {
        MaybeUser(Some(AuthUser {
            user_id: Uuid::new_v4(),
            email: "user@example.org".to_string(),
            role,
        }))
    }

    #[test]
    fn test_rescue_credit_gate_rejects_citizens_and_anonymous() {
        assert!(MaybeUser(None).require_role(&RESCUE_CREDIT_ROLES).is_err());
        assert!(user_with_role(Role::Citizen)
            .require_role(&RESCUE_CREDIT_ROLES)
            .is_err());
    }

    #[test]
    fn test_rescue_credit_gate_allows_coordinators() {
        assert!(user_with_role(Role::Ngo)
            .require_role(&RESCUE_CREDIT_ROLES)
            .is_ok());
        assert!(user_with_role(Role::Admin)
            .require_role(&RESCUE_CREDIT_ROLES)
            .is_ok());
    }
}
