#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use codex::db::{CodexStorage, DbCharacter, DbUser};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TestApp {
    pub app: Router,
    pub storage: CodexStorage,
    path: PathBuf,
}

pub struct Player {
    pub user: DbUser,
    pub token: String,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut side = self.path.clone().into_os_string();
            side.push(suffix);
            let _ = fs::remove_file(side);
        }
    }
}

/// Router backed by a fresh SQLite file in the temp dir.
pub async fn spawn_app() -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let n = DB_COUNTER.fetch_add(1, Ordering::SeqCst);

    let mut path = std::env::temp_dir();
    path.push(format!(
        "codex-test-{}-{}-{}.sqlite",
        std::process::id(),
        nanos,
        n
    ));

    let database_url = format!("sqlite:{}", path.display());
    let storage = codex::db::connect(&database_url)
        .await
        .expect("failed to open test database");
    let app = codex::codex_router(codex::CodexState::new(storage.clone()));

    TestApp { app, storage, path }
}

impl TestApp {
    pub async fn player(&self, username: &str, discord_id: Option<&str>) -> Player {
        let user = self
            .storage
            .create_user(username, discord_id)
            .await
            .expect("failed to create user");
        let token = self
            .storage
            .issue_token(user.id)
            .await
            .expect("failed to issue token");
        Player { user, token }
    }

    pub async fn character(&self, player: &Player, name: &str) -> DbCharacter {
        self.storage
            .create_character(player.user.id, name, 5, true)
            .await
            .expect("failed to create character")
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("failed to build request");
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

pub fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|item| item["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
