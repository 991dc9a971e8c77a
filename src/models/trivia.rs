// src/models/trivia.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{question::QuestionResponse, user::User};

/// Represents the 'trivias' table in the database.
/// Linked questions and users live in `trivia_questions` / `trivia_users`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Trivia {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A trivia whose question and user ids have been resolved.
#[derive(Debug, Clone)]
pub struct NewTrivia {
    pub name: String,
    pub description: String,
    pub question_ids: Vec<i64>,
    pub user_ids: Vec<i64>,
}

/// DTO for creating a trivia, also used as the full replacement on update.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTriviaRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub question_ids: Vec<i64>,
    #[serde(default)]
    pub user_ids: Vec<i64>,
}

/// Trivia aggregate as returned by the management endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TriviaResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub questions: Vec<QuestionResponse>,
    pub users: Vec<User>,
}
