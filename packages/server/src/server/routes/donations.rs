//! Donation and sponsorship routes.
//!
//! Card processing happens at the external gateway; this service records
//! the pledge, hands back a checkout URL, and finalizes on webhook.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Months, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::PageParams;
use crate::domains::donations::{Donation, Sponsorship};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::MaybeUser;

const DEFAULT_PAGE_SIZE: u32 = 20;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_donation).get(list_donations))
        .route("/webhook", post(payment_webhook))
        .route("/stats", get(donation_stats))
        .route("/my", get(my_donations))
}

pub fn sponsorships_router() -> Router {
    Router::new()
        .route("/", post(create_sponsorship).get(list_sponsorships))
        .route("/my", get(my_sponsorships))
}

#[derive(Debug, Deserialize)]
struct CreateDonationRequest {
    amount: Decimal,
    currency: Option<String>,
    donor_name: Option<String>,
    donor_email: Option<String>,
    donor_phone: Option<String>,
    message: Option<String>,
    is_anonymous: Option<bool>,
    donation_type: Option<String>,
    ngo_id: Option<Uuid>,
    payment_method: Option<String>,
}

async fn create_donation(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Json(body): Json<CreateDonationRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if body.amount <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Donation amount must be positive".to_string(),
        ));
    }

    let now = Utc::now();
    let donation = Donation {
        id: Uuid::now_v7(),
        amount: body.amount,
        currency: body.currency.unwrap_or_else(|| "INR".to_string()),
        donor_name: body.donor_name,
        donor_email: body.donor_email,
        donor_phone: body.donor_phone,
        message: body.message,
        is_anonymous: body.is_anonymous.unwrap_or(false),
        donation_type: body.donation_type.unwrap_or_else(|| "general".to_string()),
        ngo_id: body.ngo_id,
        payment_method: body.payment_method,
        payment_status: "pending".to_string(),
        transaction_id: None,
        payment_details: None,
        paid_at: None,
        user_id: auth.0.as_ref().map(|u| u.user_id),
        created_at: now,
        updated_at: now,
    };

    let donation = donation.insert(&state.db_pool).await?;

    tracing::info!(donation_id = %donation.id, amount = %donation.amount, "Donation pledged");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Donation created. Complete the payment to finish.",
            "donation": donation,
            "payment_url": format!("/pay/checkout/{}", donation.id),
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct PaymentWebhookRequest {
    donation_id: Uuid,
    payment_status: String,
    transaction_id: Option<String>,
    payment_details: Option<Value>,
}

async fn payment_webhook(
    Extension(state): Extension<AppState>,
    Json(body): Json<PaymentWebhookRequest>,
) -> ApiResult<Json<Value>> {
    if !["completed", "failed"].contains(&body.payment_status.as_str()) {
        return Err(ApiError::BadRequest("Invalid payment status".to_string()));
    }

    let donation = Donation::apply_payment(
        body.donation_id,
        &body.payment_status,
        body.transaction_id,
        body.payment_details,
        &state.db_pool,
    )
    .await?;

    tracing::info!(
        donation_id = %donation.id,
        status = %donation.payment_status,
        "Payment webhook processed"
    );

    Ok(Json(json!({ "success": true, "donation": donation })))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
}

async fn list_donations(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .validate(DEFAULT_PAGE_SIZE);

    let donations =
        Donation::list_completed(page.fetch_limit(), page.offset(), &state.db_pool).await?;
    let total = Donation::count_completed(&state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "donations": donations,
        "pagination": page.info(total),
    })))
}

async fn donation_stats(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let stats = Donation::stats(&state.db_pool).await?;

    Ok(Json(json!({ "success": true, "stats": stats })))
}

async fn my_donations(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
) -> ApiResult<Json<Value>> {
    let user = auth.require()?;
    let donations = Donation::find_for_user(user.user_id, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "donations": donations })))
}

#[derive(Debug, Deserialize)]
struct CreateSponsorshipRequest {
    animal_id: Option<Uuid>,
    animal_name: Option<String>,
    animal_type: Option<String>,
    amount_per_month: Decimal,
    duration_months: i32,
    sponsor_name: Option<String>,
    sponsor_email: Option<String>,
    sponsor_phone: Option<String>,
    message: Option<String>,
}

async fn create_sponsorship(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
    Json(body): Json<CreateSponsorshipRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if body.amount_per_month <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Monthly amount must be positive".to_string(),
        ));
    }
    if !(1..=36).contains(&body.duration_months) {
        return Err(ApiError::BadRequest(
            "Duration must be between 1 and 36 months".to_string(),
        ));
    }

    let start_date = Utc::now();
    let end_date = start_date
        .checked_add_months(Months::new(body.duration_months as u32))
        .ok_or_else(|| ApiError::BadRequest("Invalid duration".to_string()))?;

    let sponsorship = Sponsorship {
        id: Uuid::now_v7(),
        animal_id: body.animal_id,
        animal_name: body.animal_name,
        animal_type: body.animal_type,
        amount_per_month: body.amount_per_month,
        duration_months: body.duration_months,
        total_amount: body.amount_per_month * Decimal::from(body.duration_months),
        sponsor_name: body.sponsor_name,
        sponsor_email: body.sponsor_email,
        sponsor_phone: body.sponsor_phone,
        message: body.message,
        status: "active".to_string(),
        user_id: auth.0.as_ref().map(|u| u.user_id),
        start_date,
        end_date,
        created_at: start_date,
    };

    let sponsorship = sponsorship.insert(&state.db_pool).await?;

    tracing::info!(sponsorship_id = %sponsorship.id, "New sponsorship");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Sponsorship created. Thank you for your support!",
            "sponsorship": sponsorship,
        })),
    ))
}

async fn list_sponsorships(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .validate(DEFAULT_PAGE_SIZE);

    let sponsorships = Sponsorship::list(
        query.status.as_deref(),
        page.fetch_limit(),
        page.offset(),
        &state.db_pool,
    )
    .await?;
    let total = Sponsorship::count(query.status.as_deref(), &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "sponsorships": sponsorships,
        "pagination": page.info(total),
    })))
}

async fn my_sponsorships(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<MaybeUser>,
) -> ApiResult<Json<Value>> {
    let user = auth.require()?;
    let sponsorships = Sponsorship::find_for_user(user.user_id, &state.db_pool).await?;

    Ok(Json(json!({ "success": true, "sponsorships": sponsorships })))
}
