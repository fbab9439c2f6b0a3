//! NGO registration, directory and proximity search routes.

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

use crate::common::{geocode_city, nearby, GeoPoint, Role};
use crate::domains::ngos::{Ngo, NgoStatus};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::MaybeUser;

const DEFAULT_RADIUS_KM: f64 = 50.0;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/", get(list))
        .route("/nearby", get(find_nearby))
        .route("/:id", get(get_ngo).put(update))
        .route("/:id/verify", put(verify))
}

#[derive(Debug, Deserialize)]
struct RegisterNgoRequest {
    name: String,
    email: String,
    phone: String,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    registration_number: Option<String>,
    description: Option<String>,
    services: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

async fn register(
    Extension(state): Extension<AppState>,
    Json(body): Json<RegisterNgoRequest>,
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

    // Backfill coordinates from the city when the form did not supply them;
    // failure is non-fatal since admins can fix the location later
    let (mut latitude, mut longitude) = (body.latitude, body.longitude);
    if latitude.is_none() || longitude.is_none() {
        if let (Some(city), Some(ngo_state)) = (body.city.as_deref(), body.state.as_deref()) {
            match geocode_city(city, ngo_state).await {
                Ok(location) => {
                    latitude = Some(location.point.latitude);
                    longitude = Some(location.point.longitude);
                }
                Err(e) => {
                    tracing::warn!(error = %e, city, "Geocoding failed during NGO registration");
                }
            }
        }
    }

    let now = Utc::now();
    let ngo = Ngo {
        id: Uuid::now_v7(),
        name: body.name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        city: body.city,
        state: body.state,
        pincode: body.pincode,
        registration_number: body.registration_number,
        description: body.description,
        services: body.services,
        latitude,
        longitude,
        is_verified: false,
        status: NgoStatus::Pending.as_str().to_string(),
        verified_at: None,
        created_at: now,
        updated_at: now,
    };

    let ngo = ngo.insert(&state.db_pool).await?;

    tracing::info!(ngo_id = %ngo.id, "New NGO registration pending verification");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration submitted. Your NGO will be reviewed by our team.",
            "ngo": ngo,
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct ListNgosQuery {
    city: Option<String>,
    state: Option<String>,
    include_unverified: Option<bool>,
}

async fn list(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Query(query): Query<ListNgosQuery>,
) -> ApiResult<Json<Value>> {
    // Only admins may see unverified registrations
    let is_admin = matches!(&auth.0, Some(user) if user.role == Role::Admin);
    let verified_only = !(query.include_unverified.unwrap_or(false) && is_admin);

    let ngos = Ngo::list(
        query.city.as_deref(),
        query.state.as_deref(),
        verified_only,
        &state.db_pool,
    )
    .await?;

    Ok(Json(json!({ "success": true, "ngos": ngos })))
}

#[derive(Debug, Deserialize)]
struct NearbyQuery {
    latitude: f64,
    longitude: f64,
    radius: Option<f64>,
}

/// Verified NGOs within `radius` km of a point, nearest first
async fn find_nearby(
    Extension(state): Extension<AppState>,
    Query(query): Query<NearbyQuery>,
) -> ApiResult<Json<Value>> {
    if !(-90.0..=90.0).contains(&query.latitude) || !(-180.0..=180.0).contains(&query.longitude) {
        return Err(ApiError::BadRequest("Invalid coordinates".to_string()));
    }

    let radius = query.radius.unwrap_or(DEFAULT_RADIUS_KM);
    if radius <= 0.0 {
        return Err(ApiError::BadRequest("Radius must be positive".to_string()));
    }

    let origin = GeoPoint::new(query.latitude, query.longitude);
    let candidates = Ngo::find_verified(&state.db_pool).await?;
    let matches = nearby(origin, candidates, radius);

    let ngos: Vec<Value> = matches
        .into_iter()
        .map(|(ngo, distance)| {
            json!({
                "ngo": ngo,
                "distance_km": (distance * 10.0).round() / 10.0,
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "radius_km": radius,
        "ngos": ngos,
    })))
}

async fn get_ngo(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let ngo = Ngo::find_by_id(id, &state.db_pool).await?;
    let rescued_count = Ngo::rescued_count(ngo.id, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "ngo": ngo,
        "rescued_count": rescued_count,
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
    auth.require_role(&[Role::Admin])?;

    let ngo = Ngo::set_verified(id, body.verified, &state.db_pool).await?;

    tracing::info!(ngo_id = %ngo.id, verified = body.verified, "NGO verification decision");

    Ok(Json(json!({
        "success": true,
        "message": if body.verified { "NGO verified" } else { "NGO rejected" },
        "ngo": ngo,
    })))
}

async fn update(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<RegisterNgoRequest>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Ngo, Role::Admin])?;

    let existing = Ngo::find_by_id(id, &state.db_pool).await?;

    let updated = Ngo {
        name: body.name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        city: body.city,
        state: body.state,
        pincode: body.pincode,
        registration_number: body.registration_number,
        description: body.description,
        services: body.services,
        latitude: body.latitude.or(existing.latitude),
        longitude: body.longitude.or(existing.longitude),
        ..existing
    };

    let ngo = updated.update(&state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "message": "NGO updated",
        "ngo": ngo,
    })))
}
