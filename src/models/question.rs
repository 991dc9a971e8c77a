// src/models/question.rs

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Difficulty tiers accepted when a question is written.
pub const DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

/// Represents a row of the 'questions' table (options are loaded separately).
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub question: String,
    pub correct_option: i64,
    pub difficulty: String,
    pub points: i32,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'options' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
}

/// A question together with its options, in insertion order.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub question: String,

    /// Id of the correct option (never an index once persisted).
    pub correct_option: i64,

    /// One of `DIFFICULTIES` for anything written through the API.
    pub difficulty: String,

    /// Declared value only; scoring is driven by difficulty.
    pub points: i32,

    pub options: Vec<QuestionOption>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Question {
    pub fn from_row(row: QuestionRow, options: Vec<QuestionOption>) -> Self {
        Self {
            id: row.id,
            question: row.question,
            correct_option: row.correct_option,
            difficulty: row.difficulty,
            points: row.points,
            options,
            created_at: row.created_at,
        }
    }
}

/// Minimal projection used to grade submitted answers.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct AnswerKey {
    pub id: i64,
    pub correct_option: i64,
    pub difficulty: String,
}

/// A validated, sanitized question ready to be written.
/// `correct_index` points into `options` and is rewritten to an option id on insert.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub difficulty: String,
    pub points: i32,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// DTO for creating or replacing a question.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Question must be between 1 and 1000 characters"
    ))]
    pub question: String,

    /// One of `easy`, `medium`, `hard`.
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: String,

    #[validate(range(min = 0, message = "Points cannot be negative"))]
    #[serde(default)]
    pub points: i32,

    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    /// Zero-based index into `options`.
    pub correct_option: i64,
}

fn validate_difficulty(difficulty: &str) -> Result<(), ValidationError> {
    if DIFFICULTIES.contains(&difficulty) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_difficulty")
        .with_message(Cow::from("difficulty must be one of easy, medium, hard")))
}

fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() < 2 {
        return Err(ValidationError::new("too_few_options")
            .with_message(Cow::from("at least two options are required")));
    }
    for opt in options {
        if opt.trim().is_empty() {
            return Err(ValidationError::new("empty_option")
                .with_message(Cow::from("all options must have text")));
        }
        if opt.len() > 500 {
            return Err(ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

/// Query string for `GET /questions`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuestionQuery {
    /// Full-text search over question and option text.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct OptionResponse {
    pub id: i64,
    pub option: String,
}

/// Management view of a question, including the correct option id.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionResponse {
    pub id: i64,
    pub question: String,
    pub correct_option: i64,
    pub options: Vec<OptionResponse>,
    pub difficulty: String,
    pub points: i32,
}

/// DTO for sending a question to a player (excludes the correct option).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<OptionResponse>,
    pub difficulty: String,
}

fn option_responses(options: &[QuestionOption]) -> Vec<OptionResponse> {
    options
        .iter()
        .map(|o| OptionResponse {
            id: o.id,
            option: o.text.clone(),
        })
        .collect()
}

impl From<&Question> for QuestionResponse {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question: q.question.clone(),
            correct_option: q.correct_option,
            options: option_responses(&q.options),
            difficulty: q.difficulty.clone(),
            points: q.points,
        }
    }
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question: q.question.clone(),
            options: option_responses(&q.options),
            difficulty: q.difficulty.clone(),
        }
    }
}
