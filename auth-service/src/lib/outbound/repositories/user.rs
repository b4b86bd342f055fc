use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserStore;
use crate::user::errors::StoreError;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, email, password_hash, location, bio, avatar_url, rating, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.0)
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.location)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.rating)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
                {
                    return StoreError::Duplicate;
                }
            }
            StoreError::Database(e.to_string())
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, location, bio, avatar_url, rating,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(|r| user_from_row(&r)).transpose()
    }
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let corrupt = |e: sqlx::Error| StoreError::CorruptRecord(e.to_string());

    let id: Uuid = row.try_get("id").map_err(corrupt)?;
    let name: String = row.try_get("name").map_err(corrupt)?;
    let email: String = row.try_get("email").map_err(corrupt)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(corrupt)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(corrupt)?;

    Ok(User {
        id: UserId(id),
        name: DisplayName::new(name).map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
        email: EmailAddress::new(email).map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
        password_hash: row.try_get("password_hash").map_err(corrupt)?,
        location: row.try_get("location").map_err(corrupt)?,
        bio: row.try_get("bio").map_err(corrupt)?,
        avatar_url: row.try_get("avatar_url").map_err(corrupt)?,
        rating: row.try_get("rating").map_err(corrupt)?,
        created_at,
        updated_at,
    })
}
