#![allow(dead_code)]

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode, redirect::Policy};
use serde_json::{Value, json};
use server::{
    build_router,
    config::{Config, GoogleOAuth, StoreBackend},
    database::MemoryStore,
    state::AppState,
};
use tempfile::{TempDir, tempdir};
use tokio::net::TcpListener;

pub struct TestApp {
    pub base: String,
    pub client: Client,
    pub uploads: TempDir,
}

pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with_google() -> TestApp {
    spawn_app_with(|config| {
        config.google = Some(GoogleOAuth {
            client_id: "test-client".to_string(),
            client_secret: "test-client-secret".to_string(),
        });
    })
    .await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let base = format!("http://{addr}");
    let uploads = tempdir().expect("tempdir");

    let mut config = Config {
        port: addr.port(),
        store_backend: StoreBackend::Memory,
        public_url: base.clone(),
        upload_dir: uploads.path().join("media"),
        bcrypt_cost: 4,
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        ..Config::default()
    };
    customize(&mut config);

    let state = AppState::with_store(config, Arc::new(MemoryStore::default()));
    let app = build_router(state).expect("router");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let client = Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("client");

    TestApp {
        base,
        client,
        uploads,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub async fn register(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("register request")
    }

    pub async fn login(&self, username: &str, password: &str) -> StatusCode {
        let (status, _) = send(
            self.client
                .post(self.url("/api/auth/login"))
                .json(&json!({ "username": username, "password": password })),
        )
        .await;

        status
    }

    /// Registers a fresh account and returns its tokens.
    pub async fn sign_up(&self, username: &str) -> Session {
        let response = self.register(username, "correct horse").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.expect("token pair");
        Session {
            user_id: body["userId"].as_str().expect("userId").to_string(),
            access_token: body["accessToken"].as_str().expect("accessToken").to_string(),
            refresh_token: body["refreshToken"].as_str().expect("refreshToken").to_string(),
        }
    }

    pub fn get(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .bearer_auth(&session.access_token)
    }

    pub fn post(&self, session: &Session, path: &str, body: Value) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(&session.access_token)
            .json(&body)
    }

    pub fn put(&self, session: &Session, path: &str, body: Value) -> RequestBuilder {
        self.client
            .put(self.url(path))
            .bearer_auth(&session.access_token)
            .json(&body)
    }

    pub fn delete(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client
            .delete(self.url(path))
            .bearer_auth(&session.access_token)
    }
}

pub async fn send(request: RequestBuilder) -> (StatusCode, Value) {
    let response = request.send().await.expect("request");
    let status = response.status();
    let text = response.text().await.expect("body");
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

    (status, body)
}
