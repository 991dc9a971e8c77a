// src/repositories/mod.rs

//! Persistence seams. Services only see these traits; the `Pg*` types back them
//! with a `PgPool`, `memory` keeps everything in process.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        participation::{NewParticipation, Participation, RankingEntry},
        question::{AnswerKey, NewQuestion, Question},
        trivia::{NewTrivia, Trivia},
        user::{CreateUserRequest, User},
    },
};

pub mod memory;
pub mod question;
pub mod trivia;
pub mod user;

pub use memory::MemoryStore;
pub use question::PgQuestionRepository;
pub use trivia::PgTriviaRepository;
pub use user::PgUserRepository;

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Question>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, AppError>;

    /// Correct option and difficulty for every existing id in `ids`.
    /// Unknown ids are simply absent from the result.
    async fn find_answer_keys(&self, ids: &[i64]) -> Result<Vec<AnswerKey>, AppError>;

    /// Keyword search over question text and option text, best match first.
    async fn search(&self, query: &str) -> Result<Vec<Question>, AppError>;

    /// Inserts the question and its options, then rewrites the correct index
    /// to the id of the inserted option. Atomic.
    async fn create(&self, question: &NewQuestion) -> Result<Question, AppError>;

    /// Full replacement, options included. `None` when the id is unknown.
    /// When the option count is unchanged the existing option ids are kept.
    async fn update(&self, id: i64, question: &NewQuestion) -> Result<Option<Question>, AppError>;

    /// Returns false when nothing was deleted.
    /// Fails with `AppError::Conflict` when any participation answered the question.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::Conflict` when the email is taken.
    async fn create(&self, user: &CreateUserRequest) -> Result<User, AppError>;

    async fn update(&self, id: i64, user: &CreateUserRequest) -> Result<Option<User>, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TriviaRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Trivia>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Trivia>, AppError>;

    /// Questions linked to each of `trivia_ids`, with options, ordered by id.
    /// Trivias without questions are absent from the map.
    async fn find_questions_by_trivias(
        &self,
        trivia_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Question>>, AppError>;

    /// Users linked to each of `trivia_ids`, ordered by id.
    async fn find_users_by_trivias(
        &self,
        trivia_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<User>>, AppError>;

    async fn find_questions(&self, trivia_id: i64) -> Result<Vec<Question>, AppError> {
        let mut by_trivia = self.find_questions_by_trivias(&[trivia_id]).await?;
        Ok(by_trivia.remove(&trivia_id).unwrap_or_default())
    }

    async fn find_users(&self, trivia_id: i64) -> Result<Vec<User>, AppError> {
        let mut by_trivia = self.find_users_by_trivias(&[trivia_id]).await?;
        Ok(by_trivia.remove(&trivia_id).unwrap_or_default())
    }

    async fn create(&self, trivia: &NewTrivia) -> Result<Trivia, AppError>;

    /// Replaces name, description and both relation sets. `None` when the id is unknown.
    async fn update(&self, id: i64, trivia: &NewTrivia) -> Result<Option<Trivia>, AppError>;

    /// Removes the trivia and its links; questions and users are untouched.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Links a user to a trivia. Linking twice is a no-op.
    async fn assign_user(&self, trivia_id: i64, user_id: i64) -> Result<(), AppError>;

    /// Writes the participation and all of its answers in one transaction.
    async fn save_participation(
        &self,
        participation: &NewParticipation,
    ) -> Result<Participation, AppError>;

    /// Most recent participation of the user in the trivia, with its answers.
    async fn latest_participation(
        &self,
        trivia_id: i64,
        user_id: i64,
    ) -> Result<Option<Participation>, AppError>;

    /// Total score per user over all participations, highest first.
    async fn ranking(&self, trivia_id: i64) -> Result<Vec<RankingEntry>, AppError>;
}
