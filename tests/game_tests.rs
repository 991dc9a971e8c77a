// tests/game_tests.rs

mod common;

use common::{TestApp, spawn_app};
use serde_json::{Value, json};

struct Game {
    trivia: i64,
    user: i64,
    easy: i64,
    hard: i64,
    easy_options: Vec<i64>,
    hard_options: Vec<i64>,
}

/// One easy and one hard question, both answered correctly by their first option.
async fn setup_game(app: &TestApp) -> Game {
    let easy = app.create_question("2 + 2?", "easy", &["4", "5"], 0).await;
    let hard = app
        .create_question("Smallest prime above 100?", "hard", &["101", "103"], 0)
        .await;
    let user = app.create_user("Player").await;
    let trivia = app.create_trivia("Numbers", &[easy, hard], &[user]).await;

    Game {
        trivia,
        user,
        easy,
        hard,
        easy_options: app.option_ids(easy).await,
        hard_options: app.option_ids(hard).await,
    }
}

async fn submit(app: &TestApp, trivia: i64, body: Value) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/games/trivias/{}/answers", trivia)))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn one_right_one_wrong_scores_easy_weight() {
    // Arrange
    let app = spawn_app().await;
    let g = setup_game(&app).await;

    // Act
    let response = submit(
        &app,
        g.trivia,
        json!({
            "user_id": g.user,
            "responses": [
                {"question_id": g.easy, "selected_option": g.easy_options[0]},
                {"question_id": g.hard, "selected_option": g.hard_options[1]},
            ]
        }),
    )
    .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "trivia_id": g.trivia,
            "user_id": g.user,
            "correct_answers": 1,
            "total_questions": 2,
            "score": 1,
        })
    );
}

#[tokio::test]
async fn empty_responses_is_400_and_writes_nothing() {
    let app = spawn_app().await;
    let g = setup_game(&app).await;

    let response = submit(&app, g.trivia, json!({"user_id": g.user, "responses": []})).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body.get("error").is_some());
    assert_eq!(app.store.participation_count().await, 0);
}

#[tokio::test]
async fn unknown_question_is_400_and_writes_nothing() {
    let app = spawn_app().await;
    let g = setup_game(&app).await;

    let response = submit(
        &app,
        g.trivia,
        json!({
            "user_id": g.user,
            "responses": [
                {"question_id": g.easy, "selected_option": g.easy_options[0]},
                {"question_id": 987654, "selected_option": 1},
            ]
        }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.store.participation_count().await, 0);

    let (status, _) = app
        .get_json(&format!("/games/trivias/{}/users/{}/score", g.trivia, g.user))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn player_view_hides_correct_option() {
    let app = spawn_app().await;
    let g = setup_game(&app).await;

    let (status, body) = app
        .get_json(&format!("/games/trivias/{}/questions", g.trivia))
        .await;

    assert_eq!(status, 200);
    let questions = body.as_array().unwrap();
    assert_eq!(questions.len(), 2);
    for q in questions {
        assert!(q.get("correct_option").is_none());
        assert_eq!(q["options"].as_array().unwrap().len(), 2);
    }

    let (status, _) = app.get_json("/games/trivias/424242/questions").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn stored_score_matches_submission() {
    // Arrange
    let app = spawn_app().await;
    let g = setup_game(&app).await;
    let response = submit(
        &app,
        g.trivia,
        json!({
            "user_id": g.user,
            "responses": [
                {"question_id": g.easy, "selected_option": g.easy_options[0]},
                {"question_id": g.hard, "selected_option": g.hard_options[0]},
            ]
        }),
    )
    .await;
    let submitted: Value = response.json().await.unwrap();

    // Act
    let (status, stored) = app
        .get_json(&format!("/games/trivias/{}/users/{}/score", g.trivia, g.user))
        .await;

    // Assert
    assert_eq!(status, 200);
    assert_eq!(submitted["score"], 4);
    assert_eq!(stored["score"], submitted["score"]);
    assert_eq!(stored["correct_answers"], submitted["correct_answers"]);
    assert_eq!(stored["answers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn ranking_sums_all_plays() {
    let app = spawn_app().await;
    let g = setup_game(&app).await;
    let rival = app.create_user("Rival").await;

    let all_right = json!([
        {"question_id": g.easy, "selected_option": g.easy_options[0]},
        {"question_id": g.hard, "selected_option": g.hard_options[0]},
    ]);
    let easy_only = json!([
        {"question_id": g.easy, "selected_option": g.easy_options[0]},
    ]);

    submit(&app, g.trivia, json!({"user_id": g.user, "responses": easy_only.clone()})).await;
    submit(&app, g.trivia, json!({"user_id": g.user, "responses": easy_only.clone()})).await;
    submit(&app, g.trivia, json!({"user_id": rival, "responses": all_right})).await;

    let (status, body) = app
        .get_json(&format!("/games/trivias/{}/ranking", g.trivia))
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([
            {"user_id": rival, "total_score": 4},
            {"user_id": g.user, "total_score": 2},
        ])
    );
}

#[tokio::test]
async fn invalid_trivia_id_in_path_is_400() {
    let app = spawn_app().await;

    let response = submit(&app, 0, json!({"user_id": 1, "responses": []})).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .client
        .post(app.url("/games/trivias/not-a-number/answers"))
        .json(&json!({"user_id": 1, "responses": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
