// src/repositories/user.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::{AppError, is_unique_violation},
    models::user::{CreateUserRequest, User},
    repositories::UserRepository,
};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, email: &str) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict(format!("Email '{}' is already registered", email))
    } else {
        tracing::error!("Failed to write user: {:?}", e);
        AppError::InternalServerError(e.to_string())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        sqlx::query_as("SELECT id, name, email, created_at FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as("SELECT id, name, email, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create(&self, user: &CreateUserRequest) -> Result<User, AppError> {
        sqlx::query_as(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email))
    }

    async fn update(&self, id: i64, user: &CreateUserRequest) -> Result<Option<User>, AppError> {
        sqlx::query_as(
            r#"
            UPDATE users SET name = $1, email = $2
            WHERE id = $3
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}
