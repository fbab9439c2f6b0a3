use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Donation record
///
/// Payment itself is handled by the external gateway; this row tracks the
/// pledge and the webhook-driven payment status.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donation {
    pub id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub donation_type: String,
    pub ngo_id: Option<Uuid>,
    pub payment_method: Option<String>,
    pub payment_status: String, // 'pending' | 'completed' | 'failed'
    pub transaction_id: Option<String>,
    pub payment_details: Option<JsonValue>,
    pub paid_at: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public donation listing - only the fields safe to show on the donor wall
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PublicDonation {
    pub id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub donor_name: Option<String>,
    pub message: Option<String>,
    pub donation_type: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregates for /api/donations/stats
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DonationStats {
    pub total_amount: Decimal,
    pub total_donations: i64,
    pub average_donation: Decimal,
}

/// Monthly animal sponsorship
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sponsorship {
    pub id: Uuid,
    pub animal_id: Option<Uuid>,
    pub animal_name: Option<String>,
    pub animal_type: Option<String>,
    pub amount_per_month: Decimal,
    pub duration_months: i32,
    pub total_amount: Decimal,
    pub sponsor_name: Option<String>,
    pub sponsor_email: Option<String>,
    pub sponsor_phone: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub user_id: Option<Uuid>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Donation {
    /// Insert a new pending donation
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (
                id, amount, currency, donor_name, donor_email, donor_phone, message,
                is_anonymous, donation_type, ngo_id, payment_method, payment_status,
                user_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(self.amount)
        .bind(&self.currency)
        .bind(&self.donor_name)
        .bind(&self.donor_email)
        .bind(&self.donor_phone)
        .bind(&self.message)
        .bind(self.is_anonymous)
        .bind(&self.donation_type)
        .bind(self.ngo_id)
        .bind(&self.payment_method)
        .bind(&self.payment_status)
        .bind(self.user_id)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Apply a payment-gateway webhook update
    pub async fn apply_payment(
        id: Uuid,
        payment_status: &str,
        transaction_id: Option<String>,
        payment_details: Option<JsonValue>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Donation>(
            r#"
            UPDATE donations
            SET payment_status = $2,
                transaction_id = $3,
                payment_details = $4,
                paid_at = CASE WHEN $2 = 'completed' THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_status)
        .bind(transaction_id)
        .bind(payment_details)
        .fetch_one(pool)
        .await
    }

    /// Completed donations for the public donor wall, newest first
    pub async fn list_completed(
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<PublicDonation>, sqlx::Error> {
        sqlx::query_as::<_, PublicDonation>(
            r#"
            SELECT id, amount, currency,
                   CASE WHEN is_anonymous THEN 'Anonymous' ELSE donor_name END AS donor_name,
                   message, donation_type, created_at
            FROM donations
            WHERE payment_status = 'completed'
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count completed donations
    pub async fn count_completed(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM donations WHERE payment_status = 'completed'",
        )
        .fetch_one(pool)
        .await
    }

    /// Totals across completed donations
    pub async fn stats(pool: &PgPool) -> Result<DonationStats, sqlx::Error> {
        sqlx::query_as::<_, DonationStats>(
            r#"
            SELECT
                COALESCE(SUM(amount), 0) AS total_amount,
                COUNT(*) AS total_donations,
                COALESCE(AVG(amount), 0) AS average_donation
            FROM donations
            WHERE payment_status = 'completed'
            "#,
        )
        .fetch_one(pool)
        .await
    }

    /// A user's donations, newest first
    pub async fn find_for_user(user_id: Uuid, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

impl Sponsorship {
    /// Insert a new active sponsorship
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Sponsorship>(
            r#"
            INSERT INTO sponsorships (
                id, animal_id, animal_name, animal_type, amount_per_month,
                duration_months, total_amount, sponsor_name, sponsor_email,
                sponsor_phone, message, status, user_id, start_date, end_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(self.animal_id)
        .bind(&self.animal_name)
        .bind(&self.animal_type)
        .bind(self.amount_per_month)
        .bind(self.duration_months)
        .bind(self.total_amount)
        .bind(&self.sponsor_name)
        .bind(&self.sponsor_email)
        .bind(&self.sponsor_phone)
        .bind(&self.message)
        .bind(&self.status)
        .bind(self.user_id)
        .bind(self.start_date)
        .bind(self.end_date)
        .bind(self.created_at)
        .fetch_one(pool)
        .await
    }

    /// List sponsorships with optional status filter, newest first
    pub async fn list(
        status: Option<&str>,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sponsorship>(
            r#"
            SELECT * FROM sponsorships
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count sponsorships matching the status filter
    pub async fn count(status: Option<&str>, pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sponsorships WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// A user's sponsorships, newest first
    pub async fn find_for_user(user_id: Uuid, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sponsorship>(
            "SELECT * FROM sponsorships WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
