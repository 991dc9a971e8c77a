// src/handlers/trivia.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::trivia::{CreateTriviaRequest, TriviaResponse},
    services::TriviaService,
};

/// Lists trivias with their questions and assigned users.
#[utoipa::path(
    get,
    path = "/trivias",
    tag = "trivias",
    responses((status = 200, description = "Trivias", body = [TriviaResponse]))
)]
pub async fn list_trivias(
    State(service): State<TriviaService>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/trivias/{id}",
    tag = "trivias",
    params(("id" = i64, Path, description = "Trivia ID")),
    responses(
        (status = 200, description = "Trivia", body = TriviaResponse),
        (status = 404, description = "Trivia not found")
    )
)]
pub async fn get_trivia(
    State(service): State<TriviaService>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.find_by_id(id).await?))
}

/// Creates a trivia.
/// Every id in `question_ids` and `user_ids` must exist, otherwise nothing is written.
#[utoipa::path(
    post,
    path = "/trivias",
    tag = "trivias",
    request_body = CreateTriviaRequest,
    responses(
        (status = 201, description = "Trivia created"),
        (status = 400, description = "Validation failed or unknown question/user")
    )
)]
pub async fn create_trivia(
    State(service): State<TriviaService>,
    AppJson(payload): AppJson<CreateTriviaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({"id": id}))))
}

#[utoipa::path(
    put,
    path = "/trivias/{id}",
    tag = "trivias",
    params(("id" = i64, Path, description = "Trivia ID")),
    request_body = CreateTriviaRequest,
    responses(
        (status = 200, description = "Trivia updated"),
        (status = 400, description = "Validation failed or unknown question/user"),
        (status = 404, description = "Trivia not found")
    )
)]
pub async fn update_trivia(
    State(service): State<TriviaService>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CreateTriviaRequest>,
) -> Result<impl IntoResponse, AppError> {
    service.update(id, payload).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/trivias/{id}",
    tag = "trivias",
    params(("id" = i64, Path, description = "Trivia ID")),
    responses(
        (status = 204, description = "Trivia deleted"),
        (status = 404, description = "Trivia not found")
    )
)]
pub async fn delete_trivia(
    State(service): State<TriviaService>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Links an existing user to a trivia. Assigning twice is a no-op.
#[utoipa::path(
    post,
    path = "/trivias/{id}/users/{user_id}",
    tag = "trivias",
    params(
        ("id" = i64, Path, description = "Trivia ID"),
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User assigned"),
        (status = 404, description = "Trivia or user not found")
    )
)]
pub async fn assign_user(
    State(service): State<TriviaService>,
    AppPath((id, user_id)): AppPath<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    service.assign_user(id, user_id).await?;
    Ok(StatusCode::OK)
}
