// tests/question_tests.rs

mod common;

use common::spawn_app;
use serde_json::{Value, json};

#[tokio::test]
async fn unknown_route_is_404() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .client
        .get(app.url("/random_path_that_does_not_exist"))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;
    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_question_stores_correct_option_as_id() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let id = app
        .create_question("Largest planet?", "medium", &["Mars", "Jupiter", "Venus"], 1)
        .await;
    let (status, body) = app.get_json(&format!("/questions/{}", id)).await;

    // Assert
    assert_eq!(status, 200);
    let options = body["options"].as_array().unwrap();
    assert_eq!(options.len(), 3);
    assert_eq!(options[1]["option"], "Jupiter");
    assert_eq!(body["correct_option"], options[1]["id"]);
    assert_eq!(body["difficulty"], "medium");
}

#[tokio::test]
async fn correct_option_out_of_range_is_rejected() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .client
        .post(app.url("/questions"))
        .json(&json!({
            "question": "Pick one",
            "difficulty": "easy",
            "options": ["A", "B"],
            "correct_option": 2,
        }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let (_, list) = app.get_json("/questions").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn single_option_and_bad_difficulty_are_rejected() {
    let app = spawn_app().await;

    for payload in [
        json!({"question": "Q", "difficulty": "easy", "options": ["only"], "correct_option": 0}),
        json!({"question": "Q", "difficulty": "insane", "options": ["a", "b"], "correct_option": 0}),
        json!({"question": "Q", "options": ["a", "b"], "correct_option": 0}),
    ] {
        let response = app
            .client
            .post(app.url("/questions"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "payload {}", payload);
    }
}

#[tokio::test]
async fn update_replaces_options_and_delete_removes() {
    // Arrange
    let app = spawn_app().await;
    let id = app.create_question("Old?", "easy", &["x", "y"], 0).await;
    let old_ids = app.option_ids(id).await;

    // Act
    let response = app
        .client
        .put(app.url(&format!("/questions/{}", id)))
        .json(&json!({
            "question": "New?",
            "difficulty": "hard",
            "options": ["p", "q", "r"],
            "correct_option": 2,
        }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let (_, body) = app.get_json(&format!("/questions/{}", id)).await;
    assert_eq!(body["question"], "New?");
    let new_ids = app.option_ids(id).await;
    assert_eq!(new_ids.len(), 3);
    assert!(new_ids.iter().all(|o| !old_ids.contains(o)));
    assert_eq!(body["correct_option"].as_i64().unwrap(), new_ids[2]);

    let response = app
        .client
        .delete(app.url(&format!("/questions/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let (status, _) = app.get_json(&format!("/questions/{}", id)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn search_filters_questions() {
    let app = spawn_app().await;
    app.create_question("Capital of France?", "easy", &["Paris", "Rome"], 0)
        .await;
    app.create_question("Speed of light?", "hard", &["c", "g"], 0)
        .await;

    let (status, body) = app.get_json("/questions?search=france").await;

    assert_eq!(status, 200);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["question"], "Capital of France?");
}

#[tokio::test]
async fn malformed_id_and_body_are_400() {
    let app = spawn_app().await;

    let (status, body) = app.get_json("/questions/abc").await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());

    let response = app
        .client
        .post(app.url("/questions"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn answered_question_delete_is_conflict() {
    // Arrange
    let app = spawn_app().await;
    let question = app.create_question("Boiling point of water?", "hard", &["100", "90"], 0).await;
    let options = app.option_ids(question).await;
    let user = app.create_user("Marie").await;
    let trivia = app.create_trivia("Physics", &[question], &[user]).await;
    let response = app
        .client
        .post(app.url(&format!("/games/trivias/{}/answers", trivia)))
        .json(&json!({
            "user_id": user,
            "responses": [{"question_id": question, "selected_option": options[0]}]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Act
    let response = app
        .client
        .delete(app.url(&format!("/questions/{}", question)))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 409);
    let (status, stored) = app
        .get_json(&format!("/games/trivias/{}/users/{}/score", trivia, user))
        .await;
    assert_eq!(status, 200);
    assert_eq!(stored["score"], 3);
    assert_eq!(stored["correct_answers"], 1);
    assert_eq!(stored["total_questions"], 1);
}

#[tokio::test]
async fn update_keeps_option_ids_when_count_unchanged() {
    let app = spawn_app().await;
    let id = app.create_question("Primary color?", "easy", &["Red", "Pink"], 0).await;
    let before = app.option_ids(id).await;

    let response = app
        .client
        .put(app.url(&format!("/questions/{}", id)))
        .json(&json!({
            "question": "Primary color?",
            "difficulty": "easy",
            "options": ["Blue", "Pink"],
            "correct_option": 0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let (_, body) = app.get_json(&format!("/questions/{}", id)).await;
    assert_eq!(app.option_ids(id).await, before);
    assert_eq!(body["options"][0]["option"], "Blue");
    assert_eq!(body["correct_option"].as_i64().unwrap(), before[0]);
}
