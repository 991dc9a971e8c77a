// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    repositories::{
        MemoryStore, PgQuestionRepository, PgTriviaRepository, PgUserRepository,
        QuestionRepository, TriviaRepository, UserRepository,
    },
    services::{GameService, QuestionService, TriviaService, UserService},
};

/// Shared handler state. Handlers pull out the one service they need via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub questions: QuestionService,
    pub users: UserService,
    pub trivias: TriviaService,
    pub game: GameService,
}

impl AppState {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        trivias: Arc<dyn TriviaRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            questions: QuestionService::new(questions.clone()),
            users: UserService::new(users.clone()),
            trivias: TriviaService::new(trivias.clone(), questions.clone(), users.clone()),
            game: GameService::new(questions, trivias, users),
        }
    }

    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgQuestionRepository::new(pool.clone())),
            Arc::new(PgTriviaRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
        )
    }

    /// State backed by a single in-process store.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store.clone(), store)
    }
}

impl FromRef<AppState> for QuestionService {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for TriviaService {
    fn from_ref(state: &AppState) -> Self {
        state.trivias.clone()
    }
}

impl FromRef<AppState> for GameService {
    fn from_ref(state: &AppState) -> Self {
        state.game.clone()
    }
}
