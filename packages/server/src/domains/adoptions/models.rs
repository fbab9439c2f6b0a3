use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Animal listed for adoption by an NGO
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdoptionAnimal {
    pub id: Uuid,
    pub name: String,
    pub animal_type: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub age_unit: String,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub health_status: Option<String>,
    pub is_vaccinated: bool,
    pub is_neutered: bool,
    pub temperament: Option<String>,
    pub good_with_kids: bool,
    pub good_with_pets: bool,
    pub special_needs: Option<String>,
    pub images: JsonValue,
    pub ngo_id: Option<Uuid>,
    pub status: String, // 'available' | 'adopted' | 'withdrawn'
    pub adopted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional filters for the adoption catalogue
#[derive(Debug, Clone, Default)]
pub struct AnimalFilter {
    pub animal_type: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
}

/// Application to adopt an animal
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdoptionApplication {
    pub id: Uuid,
    pub animal_id: Option<Uuid>,
    pub animal_name: Option<String>,
    pub animal_type: Option<String>,
    pub animal_breed: Option<String>,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub occupation: Option<String>,
    pub has_pets: bool,
    pub current_pets: Option<String>,
    pub has_kids: bool,
    pub kids_ages: Option<String>,
    pub home_type: Option<String>,
    pub has_yard: bool,
    pub experience: Option<String>,
    pub reason: Option<String>,
    pub referees: Option<String>,
    pub ngo_id: Option<Uuid>,
    pub status: String, // 'pending' | 'approved' | 'rejected'
    pub review_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl AdoptionAnimal {
    /// Find animal by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AdoptionAnimal>("SELECT * FROM adoption_animals WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List available animals with optional filters, newest first
    pub async fn list_available(
        filter: &AnimalFilter,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AdoptionAnimal>(
            r#"
            SELECT * FROM adoption_animals
            WHERE status = 'available'
              AND ($1::text IS NULL OR animal_type = $1)
              AND ($2::text IS NULL OR breed ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR gender = $3)
              AND ($4::text IS NULL OR size = $4)
              AND ($5::int IS NULL OR age >= $5)
              AND ($6::int IS NULL OR age <= $6)
            ORDER BY created_at DESC
            LIMIT $7 OFFSET $8
            "#,
        )
        .bind(&filter.animal_type)
        .bind(&filter.breed)
        .bind(&filter.gender)
        .bind(&filter.size)
        .bind(filter.age_min)
        .bind(filter.age_max)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count available animals matching the filters
    pub async fn count_available(filter: &AnimalFilter, pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM adoption_animals
            WHERE status = 'available'
              AND ($1::text IS NULL OR animal_type = $1)
              AND ($2::text IS NULL OR breed ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR gender = $3)
              AND ($4::text IS NULL OR size = $4)
              AND ($5::int IS NULL OR age >= $5)
              AND ($6::int IS NULL OR age <= $6)
            "#,
        )
        .bind(&filter.animal_type)
        .bind(&filter.breed)
        .bind(&filter.gender)
        .bind(&filter.size)
        .bind(filter.age_min)
        .bind(filter.age_max)
        .fetch_one(pool)
        .await
    }

    /// Insert new adoption listing
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AdoptionAnimal>(
            r#"
            INSERT INTO adoption_animals (
                id, name, animal_type, breed, age, age_unit, gender, size, color,
                description, health_status, is_vaccinated, is_neutered, temperament,
                good_with_kids, good_with_pets, special_needs, images, ngo_id, status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.animal_type)
        .bind(&self.breed)
        .bind(self.age)
        .bind(&self.age_unit)
        .bind(&self.gender)
        .bind(&self.size)
        .bind(&self.color)
        .bind(&self.description)
        .bind(&self.health_status)
        .bind(self.is_vaccinated)
        .bind(self.is_neutered)
        .bind(&self.temperament)
        .bind(self.good_with_kids)
        .bind(self.good_with_pets)
        .bind(&self.special_needs)
        .bind(&self.images)
        .bind(self.ngo_id)
        .bind(&self.status)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Mark an animal adopted (application approved)
    pub async fn mark_adopted(id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AdoptionAnimal>(
            r#"
            UPDATE adoption_animals
            SET status = 'adopted', adopted_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}

impl AdoptionApplication {
    /// Find application by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AdoptionApplication>("SELECT * FROM adoption_applications WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Insert new application
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AdoptionApplication>(
            r#"
            INSERT INTO adoption_applications (
                id, animal_id, animal_name, animal_type, animal_breed,
                applicant_name, applicant_email, applicant_phone, address, city,
                state, pincode, occupation, has_pets, current_pets, has_kids,
                kids_ages, home_type, has_yard, experience, reason, referees,
                ngo_id, status, user_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(self.animal_id)
        .bind(&self.animal_name)
        .bind(&self.animal_type)
        .bind(&self.animal_breed)
        .bind(&self.applicant_name)
        .bind(&self.applicant_email)
        .bind(&self.applicant_phone)
        .bind(&self.address)
        .bind(&self.city)
        .bind(&self.state)
        .bind(&self.pincode)
        .bind(&self.occupation)
        .bind(self.has_pets)
        .bind(&self.current_pets)
        .bind(self.has_kids)
        .bind(&self.kids_ages)
        .bind(&self.home_type)
        .bind(self.has_yard)
        .bind(&self.experience)
        .bind(&self.reason)
        .bind(&self.referees)
        .bind(self.ngo_id)
        .bind(&self.status)
        .bind(self.user_id)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Applications for one animal, newest first
    pub async fn find_for_animal(animal_id: Uuid, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AdoptionApplication>(
            "SELECT * FROM adoption_applications WHERE animal_id = $1 ORDER BY created_at DESC",
        )
        .bind(animal_id)
        .fetch_all(pool)
        .await
    }

    /// A user's applications, newest first
    pub async fn find_for_user(user_id: Uuid, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AdoptionApplication>(
            "SELECT * FROM adoption_applications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Record the reviewer's decision
    pub async fn set_status(
        id: Uuid,
        status: &str,
        review_notes: Option<String>,
        reviewed_by: Uuid,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AdoptionApplication>(
            r#"
            UPDATE adoption_applications
            SET status = $2,
                review_notes = $3,
                reviewed_at = NOW(),
                reviewed_by = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(review_notes)
        .bind(reviewed_by)
        .fetch_one(pool)
        .await
    }
}
