//! Public statistics and admin dashboard routes.

use std::collections::BTreeMap;

use axum::{
    extract::{Extension, Query},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::Role;
use crate::domains::dashboard::{
    AdminStats, MonthlyTrend, PlatformStats, RecentReport, StatusCount, TopNgo, TypeCount,
    UrgencyCount,
};
use crate::domains::reports::ReportStatus;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::MaybeUser;

pub fn router() -> Router {
    Router::new()
        .route("/stats", get(stats))
        .route("/reports-by-status", get(reports_by_status))
        .route("/reports-by-animal", get(reports_by_animal))
        .route("/recent-reports", get(recent_reports))
        .route("/monthly-trends", get(monthly_trends))
        .route("/top-ngos", get(top_ngos))
        .route("/urgency-distribution", get(urgency_distribution))
        .route("/admin", get(admin_stats))
}

async fn stats(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let stats = PlatformStats::load(&state.db_pool).await?;

    Ok(Json(json!({ "success": true, "stats": stats })))
}

async fn reports_by_status(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let counts = StatusCount::reports_by_status(&state.db_pool).await?;

    // Every status appears in the response, zero or not
    let mut result: BTreeMap<&str, i64> = ReportStatus::ALL
        .iter()
        .map(|status| (status.as_str(), 0))
        .collect();
    for row in &counts {
        if let Some(entry) = result.get_mut(row.status.as_str()) {
            *entry = row.count;
        }
    }

    Ok(Json(json!({ "success": true, "data": result })))
}

async fn reports_by_animal(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let counts = TypeCount::reports_by_animal(&state.db_pool).await?;

    let data: BTreeMap<String, i64> = counts
        .into_iter()
        .map(|row| (row.animal_type, row.count))
        .collect();

    Ok(Json(json!({ "success": true, "data": data })))
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<i64>,
}

async fn recent_reports(
    Extension(state): Extension<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let reports = RecentReport::list(limit, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "reports": reports })))
}

async fn monthly_trends(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let trends = MonthlyTrend::last_year(&state.db_pool).await?;

    let data: BTreeMap<String, Value> = trends
        .into_iter()
        .map(|row| {
            (
                row.month,
                json!({ "reports": row.reports, "rescued": row.rescued }),
            )
        })
        .collect();

    Ok(Json(json!({ "success": true, "data": data })))
}

async fn top_ngos(
    Extension(state): Extension<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(5).clamp(1, 50);
    let ngos = TopNgo::by_rescues(limit, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "ngos": ngos })))
}

const REPORT_URGENCY_LEVELS: [&str; 4] = ["critical", "high", "medium", "low"];

async fn urgency_distribution(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let counts = UrgencyCount::pending_by_urgency(&state.db_pool).await?;

    let mut result: BTreeMap<&str, i64> = REPORT_URGENCY_LEVELS
        .iter()
        .map(|level| (*level, 0))
        .collect();
    for row in &counts {
        if let Some(entry) = result.get_mut(row.urgency_level.as_str()) {
            *entry = row.count;
        }
    }

    Ok(Json(json!({ "success": true, "data": result })))
}

async fn admin_stats(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Admin])?;

    let stats = AdminStats::load(&state.db_pool).await?;

    Ok(Json(json!({ "success": true, "stats": stats })))
}
