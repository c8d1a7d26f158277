use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        phone: &str,
        email: &str,
    ) -> Result<Client, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients (name, phone, email, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, phone, email, created_at",
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            "SELECT id, name, phone, email, created_at FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            "SELECT id, name, phone, email, created_at FROM clients ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        name: &str,
        phone: &str,
        email: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            "UPDATE clients SET name = $1, phone = $2, email = $3
             WHERE id = $4
             RETURNING id, name, phone, email, created_at",
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
