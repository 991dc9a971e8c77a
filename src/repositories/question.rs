// src/repositories/question.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::{
    error::{AppError, is_foreign_key_violation},
    models::question::{AnswerKey, NewQuestion, Question, QuestionOption, QuestionRow},
    repositories::QuestionRepository,
};

const QUESTION_COLUMNS: &str = "q.id, q.question, q.correct_option, q.difficulty, q.points, q.created_at";

#[derive(Clone)]
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Loads the options of every row in one query and assembles full questions,
/// preserving the order of `rows`.
pub(crate) async fn attach_options(
    conn: &mut PgConnection,
    rows: Vec<QuestionRow>,
) -> Result<Vec<Question>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let options: Vec<QuestionOption> = sqlx::query_as(
        "SELECT id, question_id, text FROM options WHERE question_id = ANY($1) ORDER BY id",
    )
    .bind(&ids[..])
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch options: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let mut by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
    for option in options {
        by_question.entry(option.question_id).or_default().push(option);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let options = by_question.remove(&row.id).unwrap_or_default();
            Question::from_row(row, options)
        })
        .collect())
}

/// Inserts the options of `question_id` and points `correct_option` at the
/// option chosen by `question.correct_index`. Returns the options and that id.
async fn write_options(
    conn: &mut PgConnection,
    question_id: i64,
    question: &NewQuestion,
) -> Result<(Vec<QuestionOption>, i64), AppError> {
    let mut options = Vec::with_capacity(question.options.len());
    for text in &question.options {
        let option: QuestionOption = sqlx::query_as(
            "INSERT INTO options (question_id, text) VALUES ($1, $2) RETURNING id, question_id, text",
        )
        .bind(question_id)
        .bind(text)
        .fetch_one(&mut *conn)
        .await?;
        options.push(option);
    }

    let correct = point_correct(conn, question_id, &options, question.correct_index).await?;
    Ok((options, correct))
}

/// Rewrites the text of existing options in place, keeping their ids so
/// recorded answers still name a live option. `ids` must match
/// `question.options` in length.
async fn rewrite_options(
    conn: &mut PgConnection,
    question_id: i64,
    ids: &[i64],
    question: &NewQuestion,
) -> Result<(Vec<QuestionOption>, i64), AppError> {
    let mut options = Vec::with_capacity(ids.len());
    for (option_id, text) in ids.iter().zip(&question.options) {
        let option: QuestionOption = sqlx::query_as(
            "UPDATE options SET text = $1 WHERE id = $2 RETURNING id, question_id, text",
        )
        .bind(text)
        .bind(option_id)
        .fetch_one(&mut *conn)
        .await?;
        options.push(option);
    }

    let correct = point_correct(conn, question_id, &options, question.correct_index).await?;
    Ok((options, correct))
}

async fn point_correct(
    conn: &mut PgConnection,
    question_id: i64,
    options: &[QuestionOption],
    correct_index: usize,
) -> Result<i64, AppError> {
    let correct = options
        .get(correct_index)
        .map(|o| o.id)
        .ok_or_else(|| AppError::BadRequest("invalid correct option index".to_string()))?;

    sqlx::query("UPDATE questions SET correct_option = $1 WHERE id = $2")
        .bind(correct)
        .bind(question_id)
        .execute(&mut *conn)
        .await?;

    Ok(correct)
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn find_all(&self) -> Result<Vec<Question>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<QuestionRow> =
            sqlx::query_as(&format!("SELECT {} FROM questions q ORDER BY q.id", QUESTION_COLUMNS))
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list questions: {:?}", e);
                    AppError::InternalServerError(e.to_string())
                })?;

        attach_options(&mut conn, rows).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let row: Option<QuestionRow> =
            sqlx::query_as(&format!("SELECT {} FROM questions q WHERE q.id = $1", QUESTION_COLUMNS))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        match row {
            Some(row) => Ok(attach_options(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_answer_keys(&self, ids: &[i64]) -> Result<Vec<AnswerKey>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as("SELECT id, correct_option, difficulty FROM questions WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch answer keys: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })
    }

    async fn search(&self, query: &str) -> Result<Vec<Question>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!(
            r#"
            SELECT {}
            FROM questions q
            WHERE to_tsvector('english', q.question) @@ plainto_tsquery('english', $1)
               OR EXISTS (
                    SELECT 1 FROM options o
                    WHERE o.question_id = q.id
                      AND to_tsvector('english', o.text) @@ plainto_tsquery('english', $1)
               )
            ORDER BY
                ts_rank(to_tsvector('english', q.question), plainto_tsquery('english', $1))
                + COALESCE((
                    SELECT MAX(ts_rank(to_tsvector('english', o.text), plainto_tsquery('english', $1)))
                    FROM options o
                    WHERE o.question_id = q.id
                ), 0) DESC,
                q.id
            "#,
            QUESTION_COLUMNS
        );

        let rows: Vec<QuestionRow> = sqlx::query_as(&sql)
            .bind(query)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search questions: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        tracing::info!("Full text search for {:?} found {} questions", query, rows.len());
        attach_options(&mut conn, rows).await
    }

    async fn create(&self, question: &NewQuestion) -> Result<Question, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: QuestionRow = sqlx::query_as(
            r#"
            INSERT INTO questions (question, difficulty, points)
            VALUES ($1, $2, $3)
            RETURNING id, question, correct_option, difficulty, points, created_at
            "#,
        )
        .bind(&question.question)
        .bind(&question.difficulty)
        .bind(question.points)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        let (options, correct_option) = write_options(&mut *tx, row.id, question).await?;
        tx.commit().await?;

        let mut created = Question::from_row(row, options);
        created.correct_option = correct_option;
        Ok(created)
    }

    async fn update(&self, id: i64, question: &NewQuestion) -> Result<Option<Question>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<QuestionRow> = sqlx::query_as(
            r#"
            UPDATE questions
            SET question = $1, difficulty = $2, points = $3
            WHERE id = $4
            RETURNING id, question, correct_option, difficulty, points, created_at
            "#,
        )
        .bind(&question.question)
        .bind(&question.difficulty)
        .bind(question.points)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let existing: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM options WHERE question_id = $1 ORDER BY id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        // Same option count: keep the ids. Otherwise the option set is rebuilt.
        let (options, correct_option) = if existing.len() == question.options.len() {
            rewrite_options(&mut tx, id, &existing, question).await?
        } else {
            sqlx::query("DELETE FROM options WHERE question_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            write_options(&mut tx, id, question).await?
        };
        tx.commit().await?;

        let mut updated = Question::from_row(row, options);
        updated.correct_option = correct_option;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(format!("Question {} has recorded answers", id))
                } else {
                    tracing::error!("Failed to delete question: {:?}", e);
                    AppError::InternalServerError(e.to_string())
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}
