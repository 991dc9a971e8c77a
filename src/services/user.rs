// src/services/user.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    models::user::{CreateUserRequest, User},
    repositories::UserRepository,
};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_all(&self) -> Result<Vec<User>, AppError> {
        self.repo.find_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<i64, AppError> {
        req.validate()?;

        let user = self.repo.create(&req).await?;
        tracing::info!("User {} created", user.id);
        Ok(user.id)
    }

    pub async fn update(&self, id: i64, req: CreateUserRequest) -> Result<(), AppError> {
        req.validate()?;

        self.repo
            .update(id, &req)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!("User {} updated", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!("User {} deleted", id);
        Ok(())
    }
}
