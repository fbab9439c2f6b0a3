//! Rescue report routes: submission, listing, tracking and assignment.

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
use crate::domains::ngos::Ngo;
use crate::domains::reports::{Report, ReportFilter, ReportStatus, ReportUpdate};
use crate::domains::volunteers::Volunteer;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::MaybeUser;

const DEFAULT_PAGE_SIZE: u32 = 10;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_report).get(list_reports))
        .route("/my", get(my_reports))
        .route("/track/:reference", get(track_report))
        .route("/:id", get(get_report))
        .route("/:id/status", put(update_status))
        .route("/:id/assign-ngo", put(assign_ngo))
        .route("/:id/assign-volunteer", put(assign_volunteer))
}

#[derive(Debug, Deserialize)]
struct CreateReportRequest {
    animal_type: String,
    condition: String,
    description: Option<String>,
    location: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    landmark: Option<String>,
    image_url: Option<String>,
    // Reporters may stay anonymous; contact fields are optional
    reporter_name: Option<String>,
    reporter_phone: Option<String>,
    reporter_email: Option<String>,
    urgency_level: Option<String>,
}

const URGENCY_LEVELS: [&str; 4] = ["critical", "high", "medium", "low"];

fn validate_new_report(body: &CreateReportRequest) -> Result<(), ApiError> {
    for (field, value) in [
        ("animal_type", &body.animal_type),
        ("condition", &body.condition),
        ("location", &body.location),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("{} is required", field)));
        }
    }

    if let Some(level) = &body.urgency_level {
        if !URGENCY_LEVELS.contains(&level.as_str()) {
            return Err(ApiError::BadRequest("Invalid urgency level".to_string()));
        }
    }

    Ok(())
}

fn reporter_name_or_default(name: Option<String>) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Anonymous".to_string())
}

async fn create_report(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Json(body): Json<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validate_new_report(&body)?;

    let urgency_level = body.urgency_level.unwrap_or_else(|| "medium".to_string());

    let now = Utc::now();
    let report = Report {
        id: Uuid::now_v7(),
        animal_type: body.animal_type,
        condition: body.condition,
        description: body.description.unwrap_or_default(),
        location: body.location,
        latitude: body.latitude,
        longitude: body.longitude,
        landmark: body.landmark.unwrap_or_default(),
        image_url: body.image_url,
        reporter_name: reporter_name_or_default(body.reporter_name),
        reporter_phone: body.reporter_phone.unwrap_or_default(),
        reporter_email: body.reporter_email.unwrap_or_default(),
        urgency_level,
        status: ReportStatus::Pending.as_str().to_string(),
        assigned_ngo_id: None,
        assigned_volunteer_id: None,
        user_id: auth.0.as_ref().map(|u| u.user_id),
        created_at: now,
        updated_at: now,
    };

    let report = report.insert(&state.db_pool).await?;

    tracing::info!(report_id = %report.id, urgency = %report.urgency_level, "New rescue report");

    // Short reference the reporter can quote when calling in
    let tracking_id = format!("JR-{}", &report.id.to_string()[..8]);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Report submitted successfully",
            "tracking_id": tracking_id,
            "report": report,
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct ListReportsQuery {
    status: Option<String>,
    animal_type: Option<String>,
    urgency_level: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

async fn list_reports(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .validate(DEFAULT_PAGE_SIZE);
    let filter = ReportFilter {
        status: query.status,
        animal_type: query.animal_type,
        urgency_level: query.urgency_level,
    };

    let reports = Report::list(&filter, page.fetch_limit(), page.offset(), &state.db_pool).await?;
    let total = Report::count(&filter, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "reports": reports,
        "pagination": page.info(total),
    })))
}

async fn my_reports(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
) -> ApiResult<Json<Value>> {
    let user = auth.require()?;
    let reports = Report::find_for_user(user.user_id, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "reports": reports })))
}

/// Public tracking lookup
///
/// Accepts the full UUID, the short "JR-xxxxxxxx" reference (with or
/// without a leading '#'), or a bare ID prefix of at least 4 characters.
async fn track_report(
    Extension(state): Extension<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<Json<Value>> {
    let needle = reference
        .trim()
        .trim_start_matches('#')
        .trim_start_matches("JR-")
        .trim_start_matches("jr-")
        .to_lowercase();

    let report = if let Ok(id) = needle.parse::<Uuid>() {
        Report::find_by_id(id, &state.db_pool).await.ok()
    } else if needle.len() >= 4 && needle.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        Report::find_by_id_prefix(&needle, &state.db_pool).await?
    } else {
        return Err(ApiError::BadRequest("Invalid tracking ID".to_string()));
    };

    let report =
        report.ok_or_else(|| ApiError::NotFound("No report found for that ID".to_string()))?;
    let updates = ReportUpdate::find_for_report(report.id, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "report": report,
        "updates": updates,
    })))
}

async fn get_report(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let report = Report::find_by_id(id, &state.db_pool).await?;

    let assigned_ngo = match report.assigned_ngo_id {
        Some(ngo_id) => Ngo::find_by_id(ngo_id, &state.db_pool).await.ok(),
        None => None,
    };
    let assigned_volunteer = match report.assigned_volunteer_id {
        Some(vol_id) => Volunteer::find_by_id(vol_id, &state.db_pool).await.ok(),
        None => None,
    };
    let updates = ReportUpdate::find_for_report(report.id, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "report": report,
        "assigned_ngo": assigned_ngo,
        "assigned_volunteer": assigned_volunteer,
        "updates": updates,
    })))
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: ReportStatus,
    notes: Option<String>,
}

async fn update_status(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Value>> {
    let user = auth.require_role(&[Role::Ngo, Role::Admin])?;

    let report = Report::set_status(id, body.status, &state.db_pool).await?;
    ReportUpdate::insert(
        report.id,
        body.status,
        body.notes,
        Some(user.user_id),
        &state.db_pool,
    )
    .await?;

    // A completed rescue counts towards the assigned volunteer's tally
    if body.status == ReportStatus::Rescued {
        if let Some(volunteer_id) = report.assigned_volunteer_id {
            Volunteer::increment_rescues(volunteer_id, &state.db_pool).await?;
        }
    }

    tracing::info!(report_id = %report.id, status = %body.status.as_str(), "Report status updated");

    Ok(Json(json!({
        "success": true,
        "message": "Status updated",
        "report": report,
    })))
}

#[derive(Debug, Deserialize)]
struct AssignNgoRequest {
    ngo_id: Uuid,
}

async fn assign_ngo(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignNgoRequest>,
) -> ApiResult<Json<Value>> {
    let user = auth.require_role(&[Role::Admin])?;

    let ngo = Ngo::find_by_id(body.ngo_id, &state.db_pool).await?;
    if !ngo.is_verified {
        return Err(ApiError::BadRequest(
            "NGO must be verified before assignment".to_string(),
        ));
    }

    let report = Report::assign_ngo(id, ngo.id, &state.db_pool).await?;
    ReportUpdate::insert(
        report.id,
        ReportStatus::Assigned,
        Some(format!("Assigned to {}", ngo.name)),
        Some(user.user_id),
        &state.db_pool,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "NGO assigned",
        "report": report,
    })))
}

#[derive(Debug, Deserialize)]
struct AssignVolunteerRequest {
    volunteer_id: Uuid,
}

async fn assign_volunteer(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignVolunteerRequest>,
) -> ApiResult<Json<Value>> {
    let user = auth.require_role(&[Role::Ngo, Role::Admin])?;

    let volunteer = Volunteer::find_by_id(body.volunteer_id, &state.db_pool).await?;
    if !volunteer.is_active {
        return Err(ApiError::BadRequest(
            "Volunteer is not currently active".to_string(),
        ));
    }

    let report = Report::assign_volunteer(id, volunteer.id, &state.db_pool).await?;
    ReportUpdate::insert(
        report.id,
        ReportStatus::InProgress,
        Some(format!("Volunteer {} dispatched", volunteer.name)),
        Some(user.user_id),
        &state.db_pool,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Volunteer assigned",
        "report": report,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_anonymous_report_is_accepted() {
        // Reporter contact details are optional; a sighting alone is valid
        let body: CreateReportRequest = serde_json::from_str(
            r#"{"animal_type":"dog","condition":"injured leg","location":"Connaught Place"}"#,
        )
        .unwrap();

        assert!(validate_new_report(&body).is_ok());
        assert_eq!(reporter_name_or_default(body.reporter_name), "Anonymous");
        assert_eq!(body.reporter_phone.unwrap_or_default(), "");
    }

    #[test]
    fn test_named_reporter_is_kept() {
        assert_eq!(
            reporter_name_or_default(Some("Asha".to_string())),
            "Asha"
        );
        assert_eq!(reporter_name_or_default(Some("  ".to_string())), "Anonymous");
    }

    #[test]
    fn test_core_fields_still_required() {
        let body: CreateReportRequest = serde_json::from_str(
            r#"{"animal_type":"dog","condition":"","location":"Connaught Place"}"#,
        )
        .unwrap();
        assert!(validate_new_report(&body).is_err());

        assert!(serde_json::from_str::<CreateReportRequest>(
            r#"{"condition":"injured","location":"somewhere"}"#
        )
        .is_err());
    }

    #[test]
    fn test_urgency_level_validated_when_present() {
        let body: CreateReportRequest = serde_json::from_str(
            r#"{"animal_type":"dog","condition":"hurt","location":"park","urgency_level":"extreme"}"#,
        )
        .unwrap();
        assert!(validate_new_report(&body).is_err());

        let body: CreateReportRequest = serde_json::from_str(
            r#"{"animal_type":"dog","condition":"hurt","location":"park","urgency_level":"high"}"#,
        )
        .unwrap();
        assert!(validate_new_report(&body).is_ok());
    }
}
