// src/models/participation.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Represents the 'participations' table in the database.
/// One user's completed attempt at one trivia.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipationRow {
    pub id: i64,
    pub user_id: i64,
    pub trivia_id: i64,
    pub score: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'answers' table in the database.
/// Owned by a participation and removed with it.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Answer {
    pub id: i64,
    pub participation_id: i64,
    pub question_id: i64,
    pub selected_option: i64,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct Participation {
    pub id: i64,
    pub user_id: i64,
    pub trivia_id: i64,
    pub score: i64,
    pub answers: Vec<Answer>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Participation {
    pub fn from_row(row: ParticipationRow, answers: Vec<Answer>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            trivia_id: row.trivia_id,
            score: row.score,
            answers,
            created_at: row.created_at,
        }
    }

    pub fn correct_answers(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}

/// A graded participation waiting to be written with its answers.
#[derive(Debug, Clone)]
pub struct NewParticipation {
    pub user_id: i64,
    pub trivia_id: i64,
    pub score: i64,
    pub answers: Vec<NewAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub question_id: i64,
    pub selected_option: i64,
    pub is_correct: bool,
}

/// DTO for submitting a trivia attempt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitAnswersRequest {
    pub user_id: i64,
    pub responses: Vec<AnswerRequest>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AnswerRequest {
    pub question_id: i64,
    /// Id of the chosen option.
    pub selected_option: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SubmitAnswersResponse {
    pub trivia_id: i64,
    pub user_id: i64,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub score: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AnswerResult {
    pub question_id: i64,
    pub selected_option: i64,
    pub is_correct: bool,
}

/// Stored result of a user's latest attempt at a trivia.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserScoreResponse {
    pub trivia_id: i64,
    pub user_id: i64,
    pub score: i64,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub answers: Vec<AnswerResult>,
}

/// Aggregated score of one user over all their attempts at a trivia.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq, Eq)]
pub struct RankingEntry {
    pub user_id: i64,
    pub total_score: i64,
}
