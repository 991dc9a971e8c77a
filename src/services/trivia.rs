// src/services/trivia.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    models::{
        question::{Question, QuestionResponse},
        trivia::{CreateTriviaRequest, NewTrivia, Trivia, TriviaResponse},
        user::User,
    },
    repositories::{QuestionRepository, TriviaRepository, UserRepository},
    utils::html::clean_html,
};

#[derive(Clone)]
pub struct TriviaService {
    trivias: Arc<dyn TriviaRepository>,
    questions: Arc<dyn QuestionRepository>,
    users: Arc<dyn UserRepository>,
}

/// Keeps the first occurrence of each id.
fn dedup(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn assemble(trivia: Trivia, questions: Vec<Question>, users: Vec<User>) -> TriviaResponse {
    TriviaResponse {
        id: trivia.id,
        name: trivia.name,
        description: trivia.description,
        questions: questions.iter().map(QuestionResponse::from).collect(),
        users,
    }
}

impl TriviaService {
    pub fn new(
        trivias: Arc<dyn TriviaRepository>,
        questions: Arc<dyn QuestionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            trivias,
            questions,
            users,
        }
    }

    /// Validates the payload and resolves every referenced id.
    /// Any unknown question or user rejects the whole request.
    async fn resolve(&self, req: CreateTriviaRequest) -> Result<NewTrivia, AppError> {
        req.validate()?;

        let question_ids = dedup(&req.question_ids);
        for id in &question_ids {
            if self.questions.find_by_id(*id).await?.is_none() {
                tracing::warn!("Question ID {} not found", id);
                return Err(AppError::BadRequest(format!("invalid question ID {}", id)));
            }
        }

        let user_ids = dedup(&req.user_ids);
        for id in &user_ids {
            if self.users.find_by_id(*id).await?.is_none() {
                tracing::warn!("User ID {} not found", id);
                return Err(AppError::BadRequest(format!("invalid user ID {}", id)));
            }
        }

        Ok(NewTrivia {
            name: clean_html(&req.name),
            description: clean_html(&req.description),
            question_ids,
            user_ids,
        })
    }

    async fn to_response(&self, trivia: Trivia) -> Result<TriviaResponse, AppError> {
        let questions = self.trivias.find_questions(trivia.id).await?;
        let users = self.trivias.find_users(trivia.id).await?;
        Ok(assemble(trivia, questions, users))
    }

    pub async fn create(&self, req: CreateTriviaRequest) -> Result<i64, AppError> {
        let new_trivia = self.resolve(req).await?;
        let created = self.trivias.create(&new_trivia).await?;

        tracing::info!(
            "Trivia {} created with {} questions and {} users",
            created.id,
            new_trivia.question_ids.len(),
            new_trivia.user_ids.len()
        );
        Ok(created.id)
    }

    /// Links for every trivia are loaded in one batch per relation.
    pub async fn find_all(&self) -> Result<Vec<TriviaResponse>, AppError> {
        let trivias = self.trivias.find_all().await?;
        let ids: Vec<i64> = trivias.iter().map(|t| t.id).collect();
        let mut questions = self.trivias.find_questions_by_trivias(&ids).await?;
        let mut users = self.trivias.find_users_by_trivias(&ids).await?;

        Ok(trivias
            .into_iter()
            .map(|trivia| {
                let linked_questions = questions.remove(&trivia.id).unwrap_or_default();
                let linked_users = users.remove(&trivia.id).unwrap_or_default();
                assemble(trivia, linked_questions, linked_users)
            })
            .collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<TriviaResponse, AppError> {
        let trivia = self
            .trivias
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trivia not found".to_string()))?;

        self.to_response(trivia).await
    }

    pub async fn update(&self, id: i64, req: CreateTriviaRequest) -> Result<(), AppError> {
        let new_trivia = self.resolve(req).await?;

        self.trivias
            .update(id, &new_trivia)
            .await?
            .ok_or_else(|| AppError::NotFound("Trivia not found".to_string()))?;

        tracing::info!("Trivia {} updated", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.trivias.delete(id).await? {
            return Err(AppError::NotFound("Trivia not found".to_string()));
        }

        tracing::info!("Trivia {} deleted", id);
        Ok(())
    }

    pub async fn assign_user(&self, trivia_id: i64, user_id: i64) -> Result<(), AppError> {
        if self.trivias.find_by_id(trivia_id).await?.is_none() {
            return Err(AppError::NotFound("Trivia not found".to_string()));
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.trivias.assign_user(trivia_id, user_id).await?;
        tracing::info!("User {} assigned to trivia {}", user_id, trivia_id);
        Ok(())
    }
}
