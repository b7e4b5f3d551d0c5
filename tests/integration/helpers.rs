//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use skirmish_api::{AppState, build_app};
use skirmish_auth::{JwtDecoder, JwtEncoder};
use skirmish_core::config::{AppConfig, StoreProvider};
use skirmish_core::types::PlayerId;
use skirmish_database::{BattleStore, MemoryBattleStore};
use skirmish_engine::{BattleEngine, Commentator, ScriptedRoller};
use skirmish_service::BattleService;

/// Test application backed by the in-memory store and scripted rolls.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Rolls consumed by the engine, in order
    pub roller: Arc<ScriptedRoller>,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application with an empty roll script.
    pub fn new() -> Self {
        Self::with_rolls(Vec::new())
    }

    /// Create a new test application whose engine draws `rolls` in order.
    pub fn with_rolls(rolls: Vec<i32>) -> Self {
        let mut config = AppConfig::default();
        config.database.provider = StoreProvider::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let roller = Arc::new(ScriptedRoller::new(rolls));
        let store: Arc<dyn BattleStore> = Arc::new(MemoryBattleStore::new());
        let engine = Arc::new(BattleEngine::new(
            roller.clone(),
            Commentator::new(config.battle.opponent_name.clone()),
        ));
        let battle_service = Arc::new(BattleService::new(
            Arc::clone(&store),
            engine,
            config.battle.clone(),
        ));

        let state = AppState::new(
            Arc::new(config.clone()),
            store,
            Arc::new(JwtDecoder::new(&config.auth)),
            battle_service,
        );

        Self {
            router: build_app(state),
            roller,
            encoder: JwtEncoder::new(&config.auth),
            config,
        }
    }

    /// Issue an access token for `player`.
    pub fn token_for(&self, player: PlayerId) -> String {
        self.encoder
            .issue(player, "tester")
            .expect("Failed to issue token")
            .0
    }

    /// Issue an access token for a fresh player.
    pub fn new_player_token(&self) -> String {
        self.token_for(PlayerId::new())
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str =
            body.map(|b| serde_json::to_string(&b).expect("Failed to serialize body"));
        self.send(method, path, body_str, token).await
    }

    /// Send a request whose JSON body is passed through as-is.
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        token: Option<&str>,
    ) -> TestResponse {
        self.send(method, path, Some(body.to_string()), token).await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if body.is_some() {
            req = req.header("Content-Type", "application/json");
        }
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body.unwrap_or_default()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Start a battle with the default duration and return its id.
    pub async fn start_battle(&self, token: &str) -> String {
        let response = self.request("POST", "/api/battles", None, Some(token)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data()["id"]
            .as_str()
            .expect("battle id")
            .to_string()
    }

    /// Apply an action to the caller's active battle.
    pub async fn act(&self, token: &str, kind: &str) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/battles/active/actions/{kind}"),
            None,
            Some(token),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of an error body.
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"].as_str()
    }
}
