// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use trivia_backend::{repositories::MemoryStore, routes, state::AppState};

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub store: Arc<MemoryStore>,
}

/// Helper function to spawn the app on a random port for testing.
/// Backed by an in-memory store, so no database is needed.
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::in_memory(store.clone());
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        store,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// POSTs `body` and returns the `id` of the created resource.
    pub async fn create(&self, path: &str, body: Value) -> i64 {
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201, "POST {} failed", path);

        let body: Value = response.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    pub async fn create_user(&self, name: &str) -> i64 {
        let email = format!("{}-{}@example.com", name.to_lowercase(), uuid::Uuid::new_v4());
        self.create("/users", json!({"name": name, "email": email}))
            .await
    }

    pub async fn create_question(&self, text: &str, difficulty: &str, options: &[&str], correct: i64) -> i64 {
        self.create(
            "/questions",
            json!({
                "question": text,
                "difficulty": difficulty,
                "options": options,
                "correct_option": correct,
            }),
        )
        .await
    }

    /// Option ids of a question, in the order they were given.
    pub async fn option_ids(&self, question_id: i64) -> Vec<i64> {
        let (_, body) = self.get_json(&format!("/questions/{}", question_id)).await;
        body["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_i64().unwrap())
            .collect()
    }

    pub async fn create_trivia(&self, name: &str, question_ids: &[i64], user_ids: &[i64]) -> i64 {
        self.create(
            "/trivias",
            json!({
                "name": name,
                "description": "integration",
                "question_ids": question_ids,
                "user_ids": user_ids,
            }),
        )
        .await
    }
}
