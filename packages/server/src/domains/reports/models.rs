use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Rescue report - an injured/distressed animal sighting submitted by a citizen
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: Uuid,
    pub animal_type: String,
    pub condition: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub landmark: String,
    pub image_url: Option<String>,
    pub reporter_name: String,
    pub reporter_phone: String,
    pub reporter_email: String,
    pub urgency_level: String,
    pub status: String, // see ReportStatus
    pub assigned_ngo_id: Option<Uuid>,
    pub assigned_volunteer_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status enum for type-safe transitions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Assigned,
    InProgress,
    Rescued,
    Closed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Rescued => "rescued",
            Self::Closed => "closed",
        }
    }

    pub const ALL: [ReportStatus; 5] = [
        Self::Pending,
        Self::Assigned,
        Self::InProgress,
        Self::Rescued,
        Self::Closed,
    ];
}

/// Optional filters for the report list
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<String>,
    pub animal_type: Option<String>,
    pub urgency_level: Option<String>,
}

/// Audit row written on every status change
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportUpdate {
    pub id: Uuid,
    pub report_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Report {
    /// Find report by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a report by the prefix of its ID (public tracking lookups)
    pub async fn find_by_id_prefix(prefix: &str, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            "SELECT * FROM reports WHERE id::text ILIKE $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(format!("{}%", prefix))
        .fetch_optional(pool)
        .await
    }

    /// List reports with optional filters, newest first
    pub async fn list(
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT * FROM reports
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR animal_type = $2)
              AND ($3::text IS NULL OR urgency_level = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&filter.status)
        .bind(&filter.animal_type)
        .bind(&filter.urgency_level)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count reports matching the filters
    pub async fn count(filter: &ReportFilter, pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reports
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR animal_type = $2)
              AND ($3::text IS NULL OR urgency_level = $3)
            "#,
        )
        .bind(&filter.status)
        .bind(&filter.animal_type)
        .bind(&filter.urgency_level)
        .fetch_one(pool)
        .await
    }

    /// Reports submitted by a user, newest first
    pub async fn find_for_user(user_id: Uuid, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            "SELECT * FROM reports WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Insert new report
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (
                id, animal_type, condition, description, location, latitude, longitude,
                landmark, image_url, reporter_name, reporter_phone, reporter_email,
                urgency_level, status, user_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.animal_type)
        .bind(&self.condition)
        .bind(&self.description)
        .bind(&self.location)
        .bind(self.latitude)
        .bind(self.longitude)
        .bind(&self.landmark)
        .bind(&self.image_url)
        .bind(&self.reporter_name)
        .bind(&self.reporter_phone)
        .bind(&self.reporter_email)
        .bind(&self.urgency_level)
        .bind(&self.status)
        .bind(self.user_id)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Set report status
    pub async fn set_status(
        id: Uuid,
        status: ReportStatus,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            "UPDATE reports SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await
    }

    /// Assign an NGO; the report moves to `assigned`
    pub async fn assign_ngo(id: Uuid, ngo_id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET assigned_ngo_id = $2, status = 'assigned', updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(ngo_id)
        .fetch_one(pool)
        .await
    }

    /// Assign a volunteer; the report moves to `in_progress`
    pub async fn assign_volunteer(
        id: Uuid,
        volunteer_id: Uuid,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET assigned_volunteer_id = $2, status = 'in_progress', updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(volunteer_id)
        .fetch_one(pool)
        .await
    }
}

impl ReportUpdate {
    /// Append a status-change audit row
    pub async fn insert(
        report_id: Uuid,
        status: ReportStatus,
        notes: Option<String>,
        updated_by: Option<Uuid>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ReportUpdate>(
            r#"
            INSERT INTO report_updates (id, report_id, status, notes, updated_by, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(report_id)
        .bind(status.as_str())
        .bind(notes)
        .bind(updated_by)
        .fetch_one(pool)
        .await
    }

    /// Update history for a report, oldest first
    pub async fn find_for_report(report_id: Uuid, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ReportUpdate>(
            "SELECT * FROM report_updates WHERE report_id = $1 ORDER BY created_at",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(ReportStatus::Pending.as_str(), "pending");
        assert_eq!(ReportStatus::InProgress.as_str(), "in_progress");
        assert_eq!(ReportStatus::ALL.len(), 5);
    }

    #[test]
    fn test_status_serde_matches_as_str() {
        for status in ReportStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
