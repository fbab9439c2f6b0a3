use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Persisted triage assessment log row
///
/// The assessment itself is computed by `scoring`; this is only the audit
/// record written after the fact.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TriageResult {
    pub id: Uuid,
    pub animal_type: Option<String>,
    pub symptoms: JsonValue,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub urgency_level: String,
    pub risk_score: i32,
    pub advice: String,
    pub first_aid: JsonValue,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Assessment counters for /api/triage/stats
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TriageStats {
    pub total_assessments: i64,
    pub critical_cases: i64,
    pub urgent_cases: i64,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl TriageResult {
    /// Insert a new assessment log row
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, TriageResult>(
            r#"
            INSERT INTO triage_results (
                id, animal_type, symptoms, description, image_url,
                urgency_level, risk_score, advice, first_aid, user_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.animal_type)
        .bind(&self.symptoms)
        .bind(&self.description)
        .bind(&self.image_url)
        .bind(&self.urgency_level)
        .bind(self.risk_score)
        .bind(&self.advice)
        .bind(&self.first_aid)
        .bind(self.user_id)
        .bind(self.created_at)
        .fetch_one(pool)
        .await
    }

    /// A user's most recent assessments
    pub async fn find_for_user(
        user_id: Uuid,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TriageResult>(
            "SELECT * FROM triage_results WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Aggregate counters across all assessments
    pub async fn stats(pool: &PgPool) -> Result<TriageStats, sqlx::Error> {
        sqlx::query_as::<_, TriageStats>(
            r#"
            SELECT
                COUNT(*) AS total_assessments,
                COUNT(*) FILTER (WHERE urgency_level = 'critical') AS critical_cases,
                COUNT(*) FILTER (WHERE urgency_level = 'urgent') AS urgent_cases
            FROM triage_results
            "#,
        )
        .fetch_one(pool)
        .await
    }
}
