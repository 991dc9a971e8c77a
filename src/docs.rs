// src/docs.rs

use utoipa::OpenApi;

use crate::{
    handlers::{game, health, question, trivia, user},
    models::{
        participation::{
            AnswerRequest, AnswerResult, RankingEntry, SubmitAnswersRequest,
            SubmitAnswersResponse, UserScoreResponse,
        },
        question::{CreateQuestionRequest, OptionResponse, PublicQuestion, QuestionResponse},
        trivia::{CreateTriviaRequest, TriviaResponse},
        user::{CreateUserRequest, User},
    },
};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trivia backend API",
        description = "Question bank, users, trivias and gameplay."
    ),
    paths(
        health::health_check,
        question::list_questions,
        question::get_question,
        question::create_question,
        question::update_question,
        question::delete_question,
        user::list_users,
        user::get_user,
        user::create_user,
        user::update_user,
        user::delete_user,
        trivia::list_trivias,
        trivia::get_trivia,
        trivia::create_trivia,
        trivia::update_trivia,
        trivia::delete_trivia,
        trivia::assign_user,
        game::get_questions,
        game::submit_answers,
        game::get_user_score,
        game::get_ranking,
    ),
    components(schemas(
        CreateQuestionRequest,
        QuestionResponse,
        OptionResponse,
        PublicQuestion,
        CreateUserRequest,
        User,
        CreateTriviaRequest,
        TriviaResponse,
        SubmitAnswersRequest,
        AnswerRequest,
        SubmitAnswersResponse,
        AnswerResult,
        UserScoreResponse,
        RankingEntry,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "questions", description = "Question bank management"),
        (name = "users", description = "User management"),
        (name = "trivias", description = "Trivia management"),
        (name = "games", description = "Playing a trivia")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_game_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/games/trivias/{id}/answers"));
        assert!(paths.contains_key("/games/trivias/{id}/questions"));
        assert!(paths.contains_key("/questions/{id}"));
    }
}
