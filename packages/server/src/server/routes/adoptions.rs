//! Adoption catalogue and application routes.

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

use crate::common::{PageParams, Role};
use crate::domains::adoptions::{AdoptionAnimal, AdoptionApplication, AnimalFilter};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::MaybeUser;

// Catalogue renders a 3x4 card grid
const DEFAULT_PAGE_SIZE: u32 = 12;

pub fn router() -> Router {
    Router::new()
        .route("/animals", post(add_animal).get(list_animals))
        .route("/animals/:id", get(get_animal))
        .route("/animals/:id/applications", get(animal_applications))
        .route("/apply", post(apply))
        .route("/applications/my", get(my_applications))
        .route("/applications/:id/status", put(update_application_status))
}

#[derive(Debug, Deserialize)]
struct AddAnimalRequest {
    name: String,
    animal_type: String,
    breed: Option<String>,
    age: Option<i32>,
    age_unit: Option<String>,
    gender: Option<String>,
    size: Option<String>,
    color: Option<String>,
    description: Option<String>,
    health_status: Option<String>,
    is_vaccinated: Option<bool>,
    is_neutered: Option<bool>,
    temperament: Option<String>,
    good_with_kids: Option<bool>,
    good_with_pets: Option<bool>,
    special_needs: Option<String>,
    images: Option<Value>,
    ngo_id: Option<Uuid>,
}

async fn add_animal(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Json(body): Json<AddAnimalRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth.require_role(&[Role::Ngo, Role::Admin])?;

    if body.name.trim().is_empty() || body.animal_type.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Name and animal type are required".to_string(),
        ));
    }

    let now = Utc::now();
    let animal = AdoptionAnimal {
        id: Uuid::now_v7(),
        name: body.name,
        animal_type: body.animal_type,
        breed: body.breed,
        age: body.age,
        age_unit: body.age_unit.unwrap_or_else(|| "years".to_string()),
        gender: body.gender,
        size: body.size,
        color: body.color,
        description: body.description,
        health_status: body.health_status,
        is_vaccinated: body.is_vaccinated.unwrap_or(false),
        is_neutered: body.is_neutered.unwrap_or(false),
        temperament: body.temperament,
        good_with_kids: body.good_with_kids.unwrap_or(false),
        good_with_pets: body.good_with_pets.unwrap_or(false),
        special_needs: body.special_needs,
        images: body.images.unwrap_or_else(|| json!([])),
        ngo_id: body.ngo_id,
        status: "available".to_string(),
        adopted_at: None,
        created_at: now,
        updated_at: now,
    };

    let animal = animal.insert(&state.db_pool).await?;

    tracing::info!(animal_id = %animal.id, "Animal listed for adoption");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Animal listed for adoption",
            "animal": animal,
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct ListAnimalsQuery {
    animal_type: Option<String>,
    breed: Option<String>,
    gender: Option<String>,
    size: Option<String>,
    age_min: Option<i32>,
    age_max: Option<i32>,
    page: Option<u32>,
    limit: Option<u32>,
}

async fn list_animals(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListAnimalsQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .validate(DEFAULT_PAGE_SIZE);

    let filter = AnimalFilter {
        animal_type: query.animal_type,
        breed: query.breed,
        gender: query.gender,
        size: query.size,
        age_min: query.age_min,
        age_max: query.age_max,
    };

    let animals =
        AdoptionAnimal::list_available(&filter, page.fetch_limit(), page.offset(), &state.db_pool)
            .await?;
    let total = AdoptionAnimal::count_available(&filter, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "animals": animals,
        "pagination": page.info(total),
    })))
}

async fn get_animal(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let animal = AdoptionAnimal::find_by_id(id, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "animal": animal })))
}

#[derive(Debug, Deserialize)]
struct ApplyRequest {
    animal_id: Uuid,
    applicant_name: String,
    applicant_email: String,
    applicant_phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    occupation: Option<String>,
    has_pets: Option<bool>,
    current_pets: Option<String>,
    has_kids: Option<bool>,
    kids_ages: Option<String>,
    home_type: Option<String>,
    has_yard: Option<bool>,
    experience: Option<String>,
    reason: Option<String>,
    referees: Option<String>,
}

async fn apply(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Json(body): Json<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if body.applicant_name.trim().is_empty() || body.applicant_email.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Applicant name and email are required".to_string(),
        ));
    }

    let animal = AdoptionAnimal::find_by_id(body.animal_id, &state.db_pool).await?;
    if animal.status != "available" {
        return Err(ApiError::BadRequest(
            "This animal is no longer available for adoption".to_string(),
        ));
    }

    let now = Utc::now();
    let application = AdoptionApplication {
        id: Uuid::now_v7(),
        animal_id: Some(animal.id),
        // Snapshot so the application stays readable if the listing changes
        animal_name: Some(animal.name.clone()),
        animal_type: Some(animal.animal_type.clone()),
        animal_breed: animal.breed.clone(),
        applicant_name: body.applicant_name,
        applicant_email: body.applicant_email,
        applicant_phone: body.applicant_phone,
        address: body.address,
        city: body.city,
        state: body.state,
        pincode: body.pincode,
        occupation: body.occupation,
        has_pets: body.has_pets.unwrap_or(false),
        current_pets: body.current_pets,
        has_kids: body.has_kids.unwrap_or(false),
        kids_ages: body.kids_ages,
        home_type: body.home_type,
        has_yard: body.has_yard.unwrap_or(false),
        experience: body.experience,
        reason: body.reason,
        referees: body.referees,
        ngo_id: animal.ngo_id,
        status: "pending".to_string(),
        review_notes: None,
        reviewed_at: None,
        reviewed_by: None,
        user_id: auth.0.as_ref().map(|u| u.user_id),
        created_at: now,
        updated_at: now,
    };

    let application = application.insert(&state.db_pool).await?;

    tracing::info!(application_id = %application.id, animal_id = %animal.id, "Adoption application received");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Application submitted. The shelter will contact you soon.",
            "application": application,
        })),
    ))
}

async fn animal_applications(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Ngo, Role::Admin])?;

    let applications = AdoptionApplication::find_for_animal(id, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "applications": applications })))
}

#[derive(Debug, Deserialize)]
struct ApplicationStatusRequest {
    status: String,
    review_notes: Option<String>,
}

async fn update_application_status(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<ApplicationStatusRequest>,
) -> ApiResult<Json<Value>> {
    let user = auth.require_role(&[Role::Ngo, Role::Admin])?;

    if !["pending", "approved", "rejected"].contains(&body.status.as_str()) {
        return Err(ApiError::BadRequest("Invalid application status".to_string()));
    }

    let application = AdoptionApplication::set_status(
        id,
        &body.status,
        body.review_notes,
        user.user_id,
        &state.db_pool,
    )
    .await?;

    // Approval takes the animal off the catalogue
    if application.status == "approved" {
        if let Some(animal_id) = application.animal_id {
            AdoptionAnimal::mark_adopted(animal_id, &state.db_pool).await?;
        }
    }

    tracing::info!(application_id = %application.id, status = %application.status, "Application reviewed");

    Ok(Json(json!({
        "success": true,
        "message": "Application updated",
        "application": application,
    })))
}

async fn my_applications(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
) -> ApiResult<Json<Value>> {
    let user = auth.require()?;
    let applications = AdoptionApplication::find_for_user(user.user_id, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "applications": applications })))
}
