use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Headline counters for the public landing page
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlatformStats {
    pub total_reports: i64,
    pub rescued_animals: i64,
    pub active_ngos: i64,
    pub active_volunteers: i64,
    pub pending_reports: i64,
    pub in_progress_reports: i64,
    pub animals_adopted: i64,
    pub total_donations: Decimal,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TypeCount {
    pub animal_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UrgencyCount {
    pub urgency_level: String,
    pub count: i64,
}

/// Trimmed report row for the recent-activity feed
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecentReport {
    pub id: Uuid,
    pub animal_type: String,
    pub condition: String,
    pub location: String,
    pub status: String,
    pub urgency_level: String,
    pub created_at: DateTime<Utc>,
}

/// Reports filed and rescues completed in one calendar month
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlyTrend {
    pub month: String, // YYYY-MM
    pub reports: i64,
    pub rescued: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopNgo {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub rescue_count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminStats {
    pub total_users: i64,
    pub pending_ngo_verifications: i64,
    pub reports_today: i64,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl PlatformStats {
    pub async fn load(pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PlatformStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM reports) AS total_reports,
                (SELECT COUNT(*) FROM reports WHERE status = 'rescued') AS rescued_animals,
                (SELECT COUNT(*) FROM ngos WHERE is_verified) AS active_ngos,
                (SELECT COUNT(*) FROM volunteers WHERE is_active) AS active_volunteers,
                (SELECT COUNT(*) FROM reports WHERE status = 'pending') AS pending_reports,
                (SELECT COUNT(*) FROM reports WHERE status = 'in_progress') AS in_progress_reports,
                (SELECT COUNT(*) FROM adoption_animals WHERE status = 'adopted') AS animals_adopted,
                (SELECT COALESCE(SUM(amount), 0) FROM donations
                 WHERE payment_status = 'completed') AS total_donations
            "#,
        )
        .fetch_one(pool)
        .await
    }
}

impl StatusCount {
    /// Report counts per status. Statuses with no rows are absent; the
    /// handler fills zeros so every status always appears in the response.
    pub async fn reports_by_status(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM reports GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }
}

impl TypeCount {
    pub async fn reports_by_animal(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TypeCount>(
            r#"
            SELECT animal_type, COUNT(*) AS count
            FROM reports
            GROUP BY animal_type
            ORDER BY count DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }
}

impl UrgencyCount {
    /// Urgency breakdown of reports still waiting for assignment
    pub async fn pending_by_urgency(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UrgencyCount>(
            r#"
            SELECT urgency_level, COUNT(*) AS count
            FROM reports
            WHERE status = 'pending'
            GROUP BY urgency_level
            "#,
        )
        .fetch_all(pool)
        .await
    }
}

impl RecentReport {
    pub async fn list(limit: i64, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, RecentReport>(
            r#"
            SELECT id, animal_type, condition, location, status, urgency_level, created_at
            FROM reports
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

impl MonthlyTrend {
    /// Reports filed in the last year, bucketed by calendar month
    pub async fn last_year(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyTrend>(
            r#"
            SELECT
                to_char(created_at, 'YYYY-MM') AS month,
                COUNT(*) AS reports,
                COUNT(*) FILTER (WHERE status = 'rescued') AS rescued
            FROM reports
            WHERE created_at >= NOW() - INTERVAL '365 days'
            GROUP BY month
            ORDER BY month
            "#,
        )
        .fetch_all(pool)
        .await
    }
}

impl TopNgo {
    pub async fn by_rescues(limit: i64, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TopNgo>(
            r#"
            SELECT
                n.id,
                n.name,
                n.city,
                COUNT(r.id) FILTER (WHERE r.status = 'rescued') AS rescue_count
            FROM ngos n
            LEFT JOIN reports r ON r.assigned_ngo_id = n.id
            WHERE n.is_verified
            GROUP BY n.id, n.name, n.city
            ORDER BY rescue_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

impl AdminStats {
    pub async fn load(pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AdminStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM profiles) AS total_users,
                (SELECT COUNT(*) FROM ngos WHERE status = 'pending') AS pending_ngo_verifications,
                (SELECT COUNT(*) FROM reports
                 WHERE created_at >= date_trunc('day', NOW())) AS reports_today
            "#,
        )
        .fetch_one(pool)
        .await
    }
}
