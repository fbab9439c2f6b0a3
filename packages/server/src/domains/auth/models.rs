use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User profile row
///
/// The password hash never leaves the model layer; responses use
/// [`Profile::public`] which drops it.
#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String, // see common::Role
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile as exposed over the API (no credential material)
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn public(self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            phone: self.phone,
            address: self.address,
            avatar_url: self.avatar_url,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Profile {
    /// Find profile by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find profile by email (login lookups)
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Insert new profile
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (
                id, email, password_hash, full_name, phone, role, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.email)
        .bind(&self.password_hash)
        .bind(&self.full_name)
        .bind(&self.phone)
        .bind(&self.role)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Update the user-editable profile fields
    pub async fn update_details(
        id: Uuid,
        full_name: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        avatar_url: Option<String>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(full_name)
        .bind(phone)
        .bind(address)
        .bind(avatar_url)
        .fetch_one(pool)
        .await
    }
}
