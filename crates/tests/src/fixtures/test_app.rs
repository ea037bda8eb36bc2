use aula_api::{build_router, state::AppState};
use aula_config::Settings;
use aula_services::store::memory::{MemoryAttendanceStore, MemoryClassroomStore};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::provider::ScriptedProvider;

/// A running test application backed by in-memory stores and a scripted
/// session provider, so tests are hermetic and can assert provider calls.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub client: reqwest::Client,
    pub provider: Arc<ScriptedProvider>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let settings = Settings::load().expect("Failed to load default settings");

        let provider = Arc::new(ScriptedProvider::new());
        let app_state = AppState::from_parts(
            settings,
            Arc::new(MemoryClassroomStore::new()),
            Arc::new(MemoryAttendanceStore::new()),
            provider.clone(),
        );
        let app = build_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base_url = format!("http://{}", addr);
        let client = reqwest::Client::new();

        Self {
            addr,
            base_url,
            client,
            provider,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT request failed")
    }

    pub async fn delete_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .json(body)
            .send()
            .await
            .expect("DELETE request failed")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Creates a classroom as an administrator and returns its id.
    pub async fn seed_classroom(&self, room_name: &str) -> String {
        let resp = self
            .post_json(
                "/api/classroom",
                &serde_json::json!({
                    "room_name": room_name,
                    "university_id": "uni-1",
                    "account_id": "admin-1",
                    "privilege": 99,
                }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 200);
        let json: Value = resp.json().await.unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    /// Creates an attendance record and returns its id.
    pub async fn seed_attendance(&self, classroom_id: &str, account_id: &str, date: &str) -> String {
        let resp = self
            .post_json(
                "/api/attendance",
                &serde_json::json!({
                    "classroom_id": classroom_id,
                    "account_id": account_id,
                    "date": date,
                }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 200);
        let json: Value = resp.json().await.unwrap();
        json["id"].as_str().unwrap().to_string()
    }
}
