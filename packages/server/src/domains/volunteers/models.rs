use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Volunteer - a citizen available for rescue work
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Volunteer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub skills: Vec<String>,
    pub availability: Option<String>,
    pub has_vehicle: bool,
    pub vehicle_type: Option<String>,
    pub experience: Option<String>,
    pub motivation: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub total_rescues: i32,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Leaderboard entry - the public subset of volunteer fields
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub total_rescues: i32,
    pub is_verified: bool,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Volunteer {
    /// Find volunteer by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Volunteer>("SELECT * FROM volunteers WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List volunteers with optional filters, most rescues first
    pub async fn list(
        city: Option<&str>,
        is_active: Option<bool>,
        has_vehicle: Option<bool>,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT * FROM volunteers
            WHERE ($1::text IS NULL OR city ILIKE '%' || $1 || '%')
              AND ($2::bool IS NULL OR is_active = $2)
              AND ($3::bool IS NULL OR has_vehicle = $3)
            ORDER BY total_rescues DESC
            "#,
        )
        .bind(city)
        .bind(is_active)
        .bind(has_vehicle)
        .fetch_all(pool)
        .await
    }

    /// Insert new volunteer registration
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Volunteer>(
            r#"
            INSERT INTO volunteers (
                id, name, email, phone, address, city, state, pincode, skills,
                availability, has_vehicle, vehicle_type, experience, motivation,
                is_active, is_verified, total_rescues, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.phone)
        .bind(&self.address)
        .bind(&self.city)
        .bind(&self.state)
        .bind(&self.pincode)
        .bind(&self.skills)
        .bind(&self.availability)
        .bind(self.has_vehicle)
        .bind(&self.vehicle_type)
        .bind(&self.experience)
        .bind(&self.motivation)
        .bind(self.is_active)
        .bind(self.is_verified)
        .bind(self.total_rescues)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Update availability flags
    pub async fn set_availability(
        id: Uuid,
        is_active: bool,
        availability: Option<String>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Volunteer>(
            r#"
            UPDATE volunteers
            SET is_active = $2, availability = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_active)
        .bind(availability)
        .fetch_one(pool)
        .await
    }

    /// Verify or unverify a volunteer (ngo/admin decision)
    pub async fn set_verified(id: Uuid, verified: bool, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Volunteer>(
            r#"
            UPDATE volunteers
            SET is_verified = $2,
                verified_at = CASE WHEN $2 THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(verified)
        .fetch_one(pool)
        .await
    }

    /// Increment the rescue tally after a completed rescue
    pub async fn increment_rescues(id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Volunteer>(
            r#"
            UPDATE volunteers
            SET total_rescues = total_rescues + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Top active volunteers by rescue count
    pub async fn leaderboard(limit: i64, pool: &PgPool) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT id, name, city, total_rescues, is_verified
            FROM volunteers
            WHERE is_active
            ORDER BY total_rescues DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

/// Normalize a skills field that may arrive as an array or a comma string
pub fn normalize_skills(raw: Option<serde_json::Value>) -> Vec<String> {
    match raw {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(serde_json::Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_skills_from_array() {
        let skills = normalize_skills(Some(json!(["first aid", " transport ", ""])));
        assert_eq!(skills, vec!["first aid", "transport"]);
    }

    #[test]
    fn test_normalize_skills_from_comma_string() {
        let skills = normalize_skills(Some(json!("first aid, transport,,handling ")));
        assert_eq!(skills, vec!["first aid", "transport", "handling"]);
    }

    #[test]
    fn test_normalize_skills_absent() {
        assert!(normalize_skills(None).is_empty());
        assert!(normalize_skills(Some(json!(42))).is_empty());
    }
}
