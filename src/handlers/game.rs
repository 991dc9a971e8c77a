// src/handlers/game.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::{
        participation::{
            RankingEntry, SubmitAnswersRequest, SubmitAnswersResponse, UserScoreResponse,
        },
        question::PublicQuestion,
    },
    services::GameService,
};

/// Questions of a trivia, without the correct options.
#[utoipa::path(
    get,
    path = "/games/trivias/{id}/questions",
    tag = "games",
    params(("id" = i64, Path, description = "Trivia ID")),
    responses(
        (status = 200, description = "Playable questions", body = [PublicQuestion]),
        (status = 404, description = "Trivia not found")
    )
)]
pub async fn get_questions(
    State(service): State<GameService>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_questions_for_trivia(id).await?))
}

/// Grades a submission and stores it.
///
/// * Correct answers score 1 / 2 / 3 for easy / medium / hard.
/// * An empty list or an unknown question rejects the whole submission.
#[utoipa::path(
    post,
    path = "/games/trivias/{id}/answers",
    tag = "games",
    params(("id" = i64, Path, description = "Trivia ID")),
    request_body = SubmitAnswersRequest,
    responses(
        (status = 200, description = "Submission graded", body = SubmitAnswersResponse),
        (status = 400, description = "Empty submission, unknown question, trivia or user")
    )
)]
pub async fn submit_answers(
    State(service): State<GameService>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<SubmitAnswersRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.submit_answers(id, payload).await?))
}

/// Latest result of one user on one trivia.
#[utoipa::path(
    get,
    path = "/games/trivias/{id}/users/{user_id}/score",
    tag = "games",
    params(
        ("id" = i64, Path, description = "Trivia ID"),
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Stored result", body = UserScoreResponse),
        (status = 404, description = "No participation")
    )
)]
pub async fn get_user_score(
    State(service): State<GameService>,
    AppPath((id, user_id)): AppPath<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_user_score(id, user_id).await?))
}

#[utoipa::path(
    get,
    path = "/games/trivias/{id}/ranking",
    tag = "games",
    params(("id" = i64, Path, description = "Trivia ID")),
    responses(
        (status = 200, description = "Users by total score, best first", body = [RankingEntry]),
        (status = 404, description = "Trivia not found")
    )
)]
pub async fn get_ranking(
    State(service): State<GameService>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_ranking(id).await?))
}
