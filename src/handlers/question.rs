// src/handlers/question.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    models::question::{CreateQuestionRequest, QuestionQuery, QuestionResponse},
    services::QuestionService,
};

/// Lists questions, or searches them when `search` is present.
#[utoipa::path(
    get,
    path = "/questions",
    tag = "questions",
    params(QuestionQuery),
    responses(
        (status = 200, description = "Questions", body = [QuestionResponse]),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_questions(
    State(service): State<QuestionService>,
    AppQuery(query): AppQuery<QuestionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let questions = match query.search {
        Some(search) => service.search(&search).await?,
        None => service.find_all().await?,
    };
    Ok(Json(questions))
}

#[utoipa::path(
    get,
    path = "/questions/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question", body = QuestionResponse),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Question not found")
    )
)]
pub async fn get_question(
    State(service): State<QuestionService>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.find_by_id(id).await?))
}

/// Creates a question. `correct_option` is an index into `options`;
/// the stored question refers to the chosen option by id.
#[utoipa::path(
    post,
    path = "/questions",
    tag = "questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created"),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_question(
    State(service): State<QuestionService>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({"id": id}))))
}

/// Replaces a question and all of its options.
#[utoipa::path(
    put,
    path = "/questions/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question ID")),
    request_body = CreateQuestionRequest,
    responses(
        (status = 200, description = "Question updated"),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Question not found")
    )
)]
pub async fn update_question(
    State(service): State<QuestionService>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    service.update(id, payload).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/questions/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question ID")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 404, description = "Question not found"),
        (status = 409, description = "Question has recorded answers")
    )
)]
pub async fn delete_question(
    State(service): State<QuestionService>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
