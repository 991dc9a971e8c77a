// src/services/game.rs

use std::{collections::HashMap, sync::Arc};

use crate::{
    error::AppError,
    models::{
        participation::{
            AnswerResult, NewAnswer, NewParticipation, RankingEntry, SubmitAnswersRequest,
            SubmitAnswersResponse, UserScoreResponse,
        },
        question::PublicQuestion,
    },
    repositories::{QuestionRepository, TriviaRepository, UserRepository},
    services::scoring,
};

/// Gameplay: serving a trivia's questions, grading a submission, reading results.
#[derive(Clone)]
pub struct GameService {
    questions: Arc<dyn QuestionRepository>,
    trivias: Arc<dyn TriviaRepository>,
    users: Arc<dyn UserRepository>,
}

impl GameService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        trivias: Arc<dyn TriviaRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            questions,
            trivias,
            users,
        }
    }

    async fn ensure_trivia(&self, trivia_id: i64) -> Result<(), AppError> {
        match self.trivias.find_by_id(trivia_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Trivia not found".to_string())),
        }
    }

    /// Questions of a trivia as a player sees them: no correct option.
    pub async fn get_questions_for_trivia(
        &self,
        trivia_id: i64,
    ) -> Result<Vec<PublicQuestion>, AppError> {
        tracing::info!("Getting questions for trivia {}", trivia_id);
        self.ensure_trivia(trivia_id).await?;

        let questions = self.trivias.find_questions(trivia_id).await?;
        Ok(questions.iter().map(PublicQuestion::from).collect())
    }

    /// Grades a complete submission and records it as a new participation.
    ///
    /// Everything is validated before the single write, so a rejected
    /// submission leaves no participation or answer behind.
    pub async fn submit_answers(
        &self,
        trivia_id: i64,
        req: SubmitAnswersRequest,
    ) -> Result<SubmitAnswersResponse, AppError> {
        tracing::info!(
            "Submitting {} answers for trivia {} by user {}",
            req.responses.len(),
            trivia_id,
            req.user_id
        );

        let question_ids: Vec<i64> = req.responses.iter().map(|r| r.question_id).collect();
        let keys: HashMap<i64, _> = self
            .questions
            .find_answer_keys(&question_ids)
            .await?
            .into_iter()
            .map(|k| (k.id, k))
            .collect();

        let card = scoring::score(&req.responses, &keys).map_err(|e| {
            tracing::warn!("Submission for trivia {} rejected: {}", trivia_id, e);
            e
        })?;

        if self.trivias.find_by_id(trivia_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("invalid trivia ID {}", trivia_id)));
        }
        if self.users.find_by_id(req.user_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("invalid user ID {}", req.user_id)));
        }

        let participation = NewParticipation {
            user_id: req.user_id,
            trivia_id,
            score: card.score,
            answers: card
                .answers
                .iter()
                .map(|a| NewAnswer {
                    question_id: a.question_id,
                    selected_option: a.selected_option,
                    is_correct: a.is_correct,
                })
                .collect(),
        };

        let saved = self
            .trivias
            .save_participation(&participation)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save participation for trivia {}: {}", trivia_id, e);
                e
            })?;

        tracing::info!(
            "Participation {} saved with score {} ({}/{} correct)",
            saved.id,
            card.score,
            card.correct_count,
            req.responses.len()
        );

        Ok(SubmitAnswersResponse {
            trivia_id,
            user_id: req.user_id,
            correct_answers: card.correct_count,
            total_questions: req.responses.len(),
            score: card.score,
        })
    }

    /// Latest stored result for the pair; the correct count comes from the stored flags.
    pub async fn get_user_score(
        &self,
        trivia_id: i64,
        user_id: i64,
    ) -> Result<UserScoreResponse, AppError> {
        let participation = self
            .trivias
            .latest_participation(trivia_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No participation found for this trivia and user".to_string())
            })?;

        Ok(UserScoreResponse {
            trivia_id,
            user_id,
            score: participation.score,
            correct_answers: participation.correct_answers(),
            total_questions: participation.answers.len(),
            answers: participation
                .answers
                .iter()
                .map(|a| AnswerResult {
                    question_id: a.question_id,
                    selected_option: a.selected_option,
                    is_correct: a.is_correct,
                })
                .collect(),
        })
    }

    pub async fn get_ranking(&self, trivia_id: i64) -> Result<Vec<RankingEntry>, AppError> {
        self.ensure_trivia(trivia_id).await?;
        self.trivias.ranking(trivia_id).await
    }
}
