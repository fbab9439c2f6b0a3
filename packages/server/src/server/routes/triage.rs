//! Urgency triage routes.
//!
//! `/assess` runs the full intake rubric, persists the result, and
//! recommends nearby verified NGOs. `/quick` runs the lightweight
//! quick-form rubric without persisting anything.

use axum::{
    extract::Extension,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{closest, nearby, GeoPoint};
use crate::domains::ngos::Ngo;
use crate::domains::triage::models::TriageResult;
use crate::domains::triage::{assess_intake, assess_quick_form, TriageAnswers, TriageAssessment};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::MaybeUser;

const CONTACT_RADIUS_KM: f64 = 50.0;
const CONTACT_COUNT: usize = 3;
const HISTORY_LIMIT: i64 = 20;

pub fn router() -> Router {
    Router::new()
        .route("/assess", post(assess))
        .route("/quick", post(quick_assess))
        .route("/history", get(history))
        .route("/stats", get(stats))
}

#[derive(Debug, Deserialize)]
struct AssessRequest {
    animal_type: Option<String>,
    #[serde(default)]
    symptoms: TriageAnswers,
    description: Option<String>,
    image_url: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn assessment_json(assessment: &TriageAssessment) -> Value {
    json!({
        "risk_score": assessment.risk_score,
        "urgency_level": assessment.urgency_level,
        "emoji": assessment.urgency_level.emoji(),
        "color": assessment.urgency_level.color(),
        "advice": assessment.advice,
        "first_aid": assessment.first_aid,
        "contact_priority": assessment.contact_priority,
    })
}

/// Recommended NGO contacts for an assessment
///
/// With a coordinate: verified NGOs within 50 km, falling back to the
/// three closest when none are in range. Without one: the first three
/// verified NGOs.
async fn recommend_contacts(
    origin: Option<GeoPoint>,
    state: &AppState,
) -> Result<Vec<Value>, sqlx::Error> {
    let contacts = match origin {
        Some(origin) => {
            let candidates = Ngo::find_verified(&state.db_pool).await?;
            let mut in_range = nearby(origin, candidates, CONTACT_RADIUS_KM);
            in_range.truncate(CONTACT_COUNT);
            if in_range.is_empty() {
                let candidates = Ngo::find_verified(&state.db_pool).await?;
                closest(origin, candidates, CONTACT_COUNT)
            } else {
                in_range
            }
        }
        None => Ngo::find_verified_limited(CONTACT_COUNT as i64, &state.db_pool)
            .await?
            .into_iter()
            .map(|ngo| (ngo, f64::NAN))
            .collect(),
    };

    Ok(contacts
        .into_iter()
        .map(|(ngo, distance)| {
            let mut entry = json!({
                "id": ngo.id,
                "name": ngo.name,
                "phone": ngo.phone,
                "city": ngo.city,
            });
            if distance.is_finite() {
                entry["distance_km"] = json!((distance * 10.0).round() / 10.0);
            }
            entry
        })
        .collect())
}

async fn assess(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Json(body): Json<AssessRequest>,
) -> ApiResult<Json<Value>> {
    let assessment = assess_intake(&body.symptoms);

    let result = TriageResult {
        id: Uuid::now_v7(),
        animal_type: body.animal_type,
        symptoms: serde_json::json!({
            "bleeding": body.symptoms.bleeding,
            "cannot_stand": body.symptoms.cannot_stand,
            "vehicle_involved": body.symptoms.vehicle_involved,
            "breathing_difficulty": body.symptoms.breathing_difficulty,
            "juvenile": body.symptoms.juvenile,
        }),
        description: body.description,
        image_url: body.image_url,
        urgency_level: assessment.urgency_level.as_str().to_string(),
        risk_score: assessment.risk_score as i32,
        advice: assessment.advice.to_string(),
        first_aid: serde_json::json!(assessment.first_aid),
        user_id: auth.0.as_ref().map(|u| u.user_id),
        created_at: Utc::now(),
    };
    let result = result.insert(&state.db_pool).await?;

    let origin = match (body.latitude, body.longitude) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        _ => None,
    };
    let contacts = recommend_contacts(origin, &state).await?;

    tracing::info!(
        assessment_id = %result.id,
        urgency = %assessment.urgency_level,
        score = assessment.risk_score,
        "Triage assessment completed"
    );

    Ok(Json(json!({
        "success": true,
        "assessment_id": result.id,
        "assessment": assessment_json(&assessment),
        "recommended_contacts": contacts,
    })))
}

#[derive(Debug, Deserialize)]
struct QuickAssessRequest {
    #[serde(default)]
    symptoms: TriageAnswers,
}

/// Stateless quick check used by the report form before submission
async fn quick_assess(Json(body): Json<QuickAssessRequest>) -> Json<Value> {
    let assessment = assess_quick_form(&body.symptoms);

    Json(json!({
        "success": true,
        "assessment": assessment_json(&assessment),
    }))
}

async fn history(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
) -> ApiResult<Json<Value>> {
    let user = auth.require()?;
    let results = TriageResult::find_for_user(user.user_id, HISTORY_LIMIT, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "assessments": results })))
}

async fn stats(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let stats = TriageResult::stats(&state.db_pool).await?;

    Ok(Json(json!({ "success": true, "stats": stats })))
}
