use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::geo::{GeoPoint, Located};

/// Rescue NGO - anchor entity for assignment and proximity search
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ngo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub registration_number: Option<String>,
    pub description: Option<String>,
    pub services: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_verified: bool,
    pub status: String, // 'pending' | 'active' | 'rejected'
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NgoStatus {
    Pending,
    Active,
    Rejected,
}

impl NgoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }
}

impl Located for Ngo {
    fn coordinate(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Ngo {
    /// Find NGO by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Ngo>("SELECT * FROM ngos WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List NGOs with optional city/state filters, ordered by name
    pub async fn list(
        city: Option<&str>,
        state: Option<&str>,
        verified_only: bool,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ngo>(
            r#"
            SELECT * FROM ngos
            WHERE (NOT $1 OR is_verified)
              AND ($2::text IS NULL OR city ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR state ILIKE '%' || $3 || '%')
            ORDER BY name
            "#,
        )
        .bind(verified_only)
        .bind(city)
        .bind(state)
        .fetch_all(pool)
        .await
    }

    /// All verified NGOs (the candidate set for proximity search)
    pub async fn find_verified(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ngo>("SELECT * FROM ngos WHERE is_verified ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// First `limit` verified NGOs, for contact recommendations without a coordinate
    pub async fn find_verified_limited(limit: i64, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ngo>("SELECT * FROM ngos WHERE is_verified ORDER BY name LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Insert new NGO registration (unverified, pending)
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Ngo>(
            r#"
            INSERT INTO ngos (
                id, name, email, phone, address, city, state, pincode,
                registration_number, description, services, latitude, longitude,
                is_verified, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
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
        .bind(&self.registration_number)
        .bind(&self.description)
        .bind(&self.services)
        .bind(self.latitude)
        .bind(self.longitude)
        .bind(self.is_verified)
        .bind(&self.status)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Verify or reject an NGO (admin decision)
    pub async fn set_verified(id: Uuid, verified: bool, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Ngo>(
            r#"
            UPDATE ngos
            SET is_verified = $2,
                status = CASE WHEN $2 THEN 'active' ELSE 'rejected' END,
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

    /// Update NGO details
    pub async fn update(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Ngo>(
            r#"
            UPDATE ngos
            SET name = $2,
                email = $3,
                phone = $4,
                address = $5,
                city = $6,
                state = $7,
                pincode = $8,
                registration_number = $9,
                description = $10,
                services = $11,
                latitude = $12,
                longitude = $13,
                updated_at = NOW()
            WHERE id = $1
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
        .bind(&self.registration_number)
        .bind(&self.description)
        .bind(&self.services)
        .bind(self.latitude)
        .bind(self.longitude)
        .fetch_one(pool)
        .await
    }

    /// Count reports assigned to this NGO that ended in rescue
    pub async fn rescued_count(id: Uuid, pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reports WHERE assigned_ngo_id = $1 AND status = 'rescued'",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_ngo() -> Ngo {
        Ngo {
            id: Uuid::now_v7(),
            name: "Paws".into(),
            email: "paws@example.org".into(),
            phone: "+911234567890".into(),
            address: None,
            city: None,
            state: None,
            pincode: None,
            registration_number: None,
            description: None,
            services: None,
            latitude: None,
            longitude: None,
            is_verified: true,
            status: "active".into(),
            verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_located_requires_both_coordinates() {
        let mut ngo = bare_ngo();
        assert!(ngo.coordinate().is_none());

        ngo.latitude = Some(28.6);
        assert!(ngo.coordinate().is_none());

        ngo.longitude = Some(77.2);
        let point = ngo.coordinate().unwrap();
        assert_eq!(point.latitude, 28.6);
        assert_eq!(point.longitude, 77.2);
    }
}
