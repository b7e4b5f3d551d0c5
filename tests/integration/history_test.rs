//! Integration tests for battle history.

mod helpers;

use axum::http::StatusCode;

use helpers::TestApp;

async fn finish_battles(app: &TestApp, token: &str, count: usize) -> Vec<String> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(app.start_battle(token).await);
        let response = app.act(token, "surrender").await;
        assert_eq!(response.status, StatusCode::OK);
    }
    ids
}

#[tokio::test]
async fn test_history_empty() {
    let app = TestApp::new();
    let token = app.new_player_token();

    let response = app
        .request("GET", "/api/battles/history", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_history_lists_finished_battles_newest_first() {
    let app = TestApp::new();
    let token = app.new_player_token();
    let ids = finish_battles(&app, &token, 3).await;
    app.start_battle(&token).await;

    let response = app
        .request("GET", "/api/battles/history", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let battles = response.data().as_array().expect("history array");
    assert_eq!(battles.len(), 3);

    let listed: Vec<&str> = battles.iter().filter_map(|b| b["id"].as_str()).collect();
    let expected: Vec<&str> = ids.iter().rev().map(String::as_str).collect();
    assert_eq!(listed, expected);

    for battle in battles {
        assert_eq!(battle["status"], "surrendered");
        assert_eq!(battle["winner"], "opponent");
        assert!(battle.get("log").is_none());
        assert!(!battle["completed_at"].is_null());
    }
}

#[tokio::test]
async fn test_history_limit_parameter() {
    let app = TestApp::new();
    let token = app.new_player_token();
    let ids = finish_battles(&app, &token, 3).await;

    let response = app
        .request("GET", "/api/battles/history?limit=1", None, Some(&token))
        .await;

    let battles = response.data().as_array().expect("history array");
    assert_eq!(battles.len(), 1);
    assert_eq!(battles[0]["id"], ids[2].as_str());
}

#[tokio::test]
async fn test_history_is_capped_at_configured_limit() {
    let app = TestApp::new();
    let token = app.new_player_token();
    finish_battles(&app, &token, 22).await;

    for path in ["/api/battles/history", "/api/battles/history?limit=500"] {
        let response = app.request("GET", path, None, Some(&token)).await;
        assert_eq!(
            response.data().as_array().map(Vec::len),
            Some(app.config.battle.history_limit as usize),
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_history_is_per_player() {
    let app = TestApp::new();
    let first = app.new_player_token();
    let second = app.new_player_token();
    finish_battles(&app, &first, 2).await;

    let response = app
        .request("GET", "/api/battles/history", None, Some(&second))
        .await;
    assert_eq!(response.data().as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_history_requires_token() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/battles/history", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
