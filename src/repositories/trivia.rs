// src/repositories/trivia.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::{
        participation::{Answer, NewParticipation, Participation, ParticipationRow, RankingEntry},
        question::{Question, QuestionRow},
        trivia::{NewTrivia, Trivia},
        user::User,
    },
    repositories::{TriviaRepository, question::attach_options},
};

#[derive(Clone)]
pub struct PgTriviaRepository {
    pool: PgPool,
}

impl PgTriviaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A linked user together with the trivia it is linked to.
#[derive(sqlx::FromRow)]
struct TriviaUserRow {
    trivia_id: i64,
    #[sqlx(flatten)]
    user: User,
}

/// Inserts `(trivia_id, id)` pairs into a relation table.
async fn link(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
    trivia_id: i64,
    ids: &[i64],
) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("INSERT INTO {} (trivia_id, {}) ", table, column));
    builder.push_values(ids, |mut row, id| {
        row.push_bind(trivia_id).push_bind(*id);
    });
    builder.push(" ON CONFLICT DO NOTHING");

    builder.build().execute(&mut *conn).await.map_err(|e| {
        tracing::error!("Failed to link {} to trivia {}: {:?}", table, trivia_id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(())
}

#[async_trait]
impl TriviaRepository for PgTriviaRepository {
    async fn find_all(&self) -> Result<Vec<Trivia>, AppError> {
        sqlx::query_as("SELECT id, name, description, created_at FROM trivias ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list trivias: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Trivia>, AppError> {
        let trivia =
            sqlx::query_as("SELECT id, name, description, created_at FROM trivias WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(trivia)
    }

    async fn find_questions_by_trivias(
        &self,
        trivia_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Question>>, AppError> {
        if trivia_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.pool.acquire().await?;
        let links: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT trivia_id, question_id
            FROM trivia_questions
            WHERE trivia_id = ANY($1)
            ORDER BY trivia_id, question_id
            "#,
        )
        .bind(trivia_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch question links: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        let mut question_ids: Vec<i64> = links.iter().map(|(_, q)| *q).collect();
        question_ids.sort_unstable();
        question_ids.dedup();

        let rows: Vec<QuestionRow> = sqlx::query_as(
            r#"
            SELECT q.id, q.question, q.correct_option, q.difficulty, q.points, q.created_at
            FROM questions q
            WHERE q.id = ANY($1)
            ORDER BY q.id
            "#,
        )
        .bind(&question_ids[..])
        .fetch_all(&mut *conn)
        .await?;

        let questions: HashMap<i64, Question> = attach_options(&mut conn, rows)
            .await?
            .into_iter()
            .map(|q| (q.id, q))
            .collect();

        let mut by_trivia: HashMap<i64, Vec<Question>> = HashMap::new();
        for (trivia_id, question_id) in links {
            if let Some(question) = questions.get(&question_id) {
                by_trivia.entry(trivia_id).or_default().push(question.clone());
            }
        }
        Ok(by_trivia)
    }

    async fn find_users_by_trivias(
        &self,
        trivia_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<User>>, AppError> {
        if trivia_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<TriviaUserRow> = sqlx::query_as(
            r#"
            SELECT tu.trivia_id, u.id, u.name, u.email, u.created_at
            FROM users u
            JOIN trivia_users tu ON tu.user_id = u.id
            WHERE tu.trivia_id = ANY($1)
            ORDER BY tu.trivia_id, u.id
            "#,
        )
        .bind(trivia_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch users for trivias: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        let mut by_trivia: HashMap<i64, Vec<User>> = HashMap::new();
        for row in rows {
            by_trivia.entry(row.trivia_id).or_default().push(row.user);
        }
        Ok(by_trivia)
    }

    async fn create(&self, trivia: &NewTrivia) -> Result<Trivia, AppError> {
        let mut tx = self.pool.begin().await?;

        let created: Trivia = sqlx::query_as(
            r#"
            INSERT INTO trivias (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&trivia.name)
        .bind(&trivia.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create trivia: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        link(&mut tx, "trivia_questions", "question_id", created.id, &trivia.question_ids).await?;
        link(&mut tx, "trivia_users", "user_id", created.id, &trivia.user_ids).await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn update(&self, id: i64, trivia: &NewTrivia) -> Result<Option<Trivia>, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<Trivia> = sqlx::query_as(
            r#"
            UPDATE trivias SET name = $1, description = $2
            WHERE id = $3
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&trivia.name)
        .bind(&trivia.description)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update trivia: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM trivia_questions WHERE trivia_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM trivia_users WHERE trivia_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        link(&mut tx, "trivia_questions", "question_id", id, &trivia.question_ids).await?;
        link(&mut tx, "trivia_users", "user_id", id, &trivia.user_ids).await?;
        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM trivias WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete trivia: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn assign_user(&self, trivia_id: i64, user_id: i64) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        link(&mut conn, "trivia_users", "user_id", trivia_id, &[user_id]).await
    }

    async fn save_participation(
        &self,
        participation: &NewParticipation,
    ) -> Result<Participation, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: ParticipationRow = sqlx::query_as(
            r#"
            INSERT INTO participations (user_id, trivia_id, score)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, trivia_id, score, created_at
            "#,
        )
        .bind(participation.user_id)
        .bind(participation.trivia_id)
        .bind(participation.score)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save participation: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        let mut answers = Vec::with_capacity(participation.answers.len());
        for answer in &participation.answers {
            let saved: Answer = sqlx::query_as(
                r#"
                INSERT INTO answers (participation_id, question_id, selected_option, is_correct)
                VALUES ($1, $2, $3, $4)
                RETURNING id, participation_id, question_id, selected_option, is_correct
                "#,
            )
            .bind(row.id)
            .bind(answer.question_id)
            .bind(answer.selected_option)
            .bind(answer.is_correct)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save answer for question {}: {:?}", answer.question_id, e);
                AppError::InternalServerError(e.to_string())
            })?;
            answers.push(saved);
        }

        tx.commit().await?;

        Ok(Participation::from_row(row, answers))
    }

    async fn latest_participation(
        &self,
        trivia_id: i64,
        user_id: i64,
    ) -> Result<Option<Participation>, AppError> {
        let row: Option<ParticipationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, trivia_id, score, created_at
            FROM participations
            WHERE trivia_id = $1 AND user_id = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(trivia_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let answers: Vec<Answer> = sqlx::query_as(
            r#"
            SELECT id, participation_id, question_id, selected_option, is_correct
            FROM answers
            WHERE participation_id = $1
            ORDER BY id
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Participation::from_row(row, answers)))
    }

    async fn ranking(&self, trivia_id: i64) -> Result<Vec<RankingEntry>, AppError> {
        sqlx::query_as(
            r#"
            SELECT user_id, SUM(score)::BIGINT AS total_score
            FROM participations
            WHERE trivia_id = $1
            GROUP BY user_id
            ORDER BY total_score DESC, user_id ASC
            "#,
        )
        .bind(trivia_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute ranking for trivia {}: {:?}", trivia_id, e);
            AppError::InternalServerError(e.to_string())
        })
    }
}
