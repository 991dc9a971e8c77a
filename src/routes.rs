// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{game, health, question, trivia, user},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (questions, users, trivias, games).
/// * Serves Swagger UI and the OpenAPI document.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let question_routes = Router::new()
        .route(
            "/",
            get(question::list_questions).post(question::create_question),
        )
        .route(
            "/{id}",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        );

    let user_routes = Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route(
            "/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        );

    let trivia_routes = Router::new()
        .route("/", get(trivia::list_trivias).post(trivia::create_trivia))
        .route(
            "/{id}",
            get(trivia::get_trivia)
                .put(trivia::update_trivia)
                .delete(trivia::delete_trivia),
        )
        .route("/{id}/users/{user_id}", post(trivia::assign_user));

    let game_routes = Router::new()
        .route("/{id}/questions", get(game::get_questions))
        .route("/{id}/answers", post(game::submit_answers))
        .route("/{id}/users/{user_id}/score", get(game::get_user_score))
        .route("/{id}/ranking", get(game::get_ranking));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/questions", question_routes)
        .nest("/users", user_routes)
        .nest("/trivias", trivia_routes)
        .nest("/games/trivias", game_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
