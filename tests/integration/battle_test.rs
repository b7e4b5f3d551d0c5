//! Integration tests for the battle lifecycle endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app.request("POST", "/api/battles", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_bad_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/battles/active", None, Some("garbage"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_battle_defaults() {
    let app = TestApp::new();
    let token = app.new_player_token();

    let response = app.request("POST", "/api/battles", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let battle = response.data();
    assert_eq!(battle["status"], "active");
    assert_eq!(battle["player_health"], 100);
    assert_eq!(battle["opponent_health"], 100);
    assert_eq!(battle["total_duration"], 60);
    assert_eq!(battle["time_remaining"], 60);
    assert!(battle["winner"].is_null());
    assert_eq!(battle["log"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_create_battle_with_duration() {
    let app = TestApp::new();
    let token = app.new_player_token();

    let response = app
        .request(
            "POST",
            "/api/battles",
            Some(json!({ "duration_seconds": 90 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["total_duration"], 90);
}

#[tokio::test]
async fn test_create_battle_rejects_out_of_range_duration() {
    let app = TestApp::new();
    let token = app.new_player_token();

    for duration in [0, 10, 301] {
        let response = app
            .request(
                "POST",
                "/api/battles",
                Some(json!({ "duration_seconds": duration })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{duration}");
        assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
    }
}

#[tokio::test]
async fn test_create_battle_rejects_malformed_json() {
    let app = TestApp::new();
    let token = app.new_player_token();

    let response = app
        .request_raw("POST", "/api/battles", "{\"duration_seconds\":", Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));

    let active = app
        .request("GET", "/api/battles/active", None, Some(&token))
        .await;
    assert!(active.data().is_null());
}

#[tokio::test]
async fn test_second_battle_while_active_conflicts() {
    let app = TestApp::new();
    let token = app.new_player_token();
    app.start_battle(&token).await;

    let response = app.request("POST", "/api/battles", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), Some("CONFLICT"));
}

#[tokio::test]
async fn test_active_is_null_without_battle() {
    let app = TestApp::new();
    let token = app.new_player_token();

    let response = app
        .request("GET", "/api/battles/active", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data().is_null());
}

#[tokio::test]
async fn test_heal_with_scripted_rolls() {
    let app = TestApp::with_rolls(vec![3, 3]);
    let token = app.new_player_token();
    app.start_battle(&token).await;

    let response = app.act(&token, "heal").await;

    assert_eq!(response.status, StatusCode::OK);
    let outcome = &response.data()["outcome"];
    assert_eq!(outcome["kind"], "heal");
    assert_eq!(outcome["player_delta"], 8);
    assert_eq!(outcome["opponent_delta"], 3);
    assert_eq!(outcome["player_health"], 97);
    assert_eq!(outcome["opponent_health"], 100);
    assert!(!outcome["commentary"].as_array().expect("commentary").is_empty());

    let battle = &response.data()["battle"];
    assert_eq!(battle["status"], "active");
    assert_eq!(battle["log_total"], 1);
}

#[tokio::test]
async fn test_power_attack_accepts_both_spellings() {
    let app = TestApp::with_rolls(vec![1, 1, 1, 1]);
    let token = app.new_player_token();
    app.start_battle(&token).await;

    let first = app.act(&token, "power_attack").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["outcome"]["opponent_health"], 94);

    let second = app.act(&token, "power-attack").await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.data()["outcome"]["opponent_health"], 88);
    assert_eq!(second.data()["outcome"]["player_health"], 88);
}

#[tokio::test]
async fn test_unknown_action_is_rejected_without_mutation() {
    let app = TestApp::new();
    let token = app.new_player_token();
    app.start_battle(&token).await;

    let response = app.act(&token, "fireball").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));

    let active = app
        .request("GET", "/api/battles/active", None, Some(&token))
        .await;
    assert_eq!(active.data()["log_total"], 0);
    assert_eq!(active.data()["player_health"], 100);
}

#[tokio::test]
async fn test_action_without_active_battle_is_not_active() {
    let app = TestApp::new();
    let token = app.new_player_token();

    let response = app.act(&token, "attack").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), Some("SESSION_NOT_ACTIVE"));

    let tick = app
        .request("POST", "/api/battles/active/tick", None, Some(&token))
        .await;
    assert_eq!(tick.status, StatusCode::CONFLICT);
    assert_eq!(tick.error_code(), Some("SESSION_NOT_ACTIVE"));
}

#[tokio::test]
async fn test_knockout_completes_battle() {
    // Nine exchanges of 10/1 leave the opponent at 10; the tenth lands 10.
    let mut rolls = Vec::new();
    for _ in 0..10 {
        rolls.extend([10, 1]);
    }
    let app = TestApp::with_rolls(rolls);
    let token = app.new_player_token();
    let id = app.start_battle(&token).await;

    for _ in 0..9 {
        let response = app.act(&token, "attack").await;
        assert_eq!(response.data()["outcome"]["status"], "active");
    }
    let last = app.act(&token, "attack").await;

    assert_eq!(last.status, StatusCode::OK);
    assert_eq!(last.data()["outcome"]["status"], "completed");
    assert_eq!(last.data()["outcome"]["winner"], "player");
    assert_eq!(last.data()["battle"]["opponent_health"], 0);
    assert_eq!(last.data()["battle"]["player_health"], 90);
    assert!(!last.data()["battle"]["completed_at"].is_null());

    let after = app.act(&token, "attack").await;
    assert_eq!(after.status, StatusCode::CONFLICT);
    assert_eq!(after.error_code(), Some("SESSION_NOT_ACTIVE"));

    let stored = app
        .request("GET", &format!("/api/battles/{id}"), None, Some(&token))
        .await;
    assert_eq!(stored.status, StatusCode::OK);
    assert_eq!(stored.data()["status"], "completed");
    assert_eq!(stored.data()["log_total"], 10);
}

#[tokio::test]
async fn test_surrender() {
    let app = TestApp::new();
    let token = app.new_player_token();
    app.start_battle(&token).await;

    let response = app.act(&token, "surrender").await;

    assert_eq!(response.status, StatusCode::OK);
    let outcome = &response.data()["outcome"];
    assert_eq!(outcome["status"], "surrendered");
    assert_eq!(outcome["winner"], "opponent");
    assert_eq!(outcome["player_health"], 100);
    assert_eq!(outcome["commentary"].as_array().map(Vec::len), Some(2));

    let active = app
        .request("GET", "/api/battles/active", None, Some(&token))
        .await;
    assert!(active.data().is_null());
}

#[tokio::test]
async fn test_tick_counts_down() {
    let app = TestApp::new();
    let token = app.new_player_token();
    app.start_battle(&token).await;

    let response = app
        .request("POST", "/api/battles/active/tick", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["outcome"]["time_remaining"], 59);
    assert_eq!(response.data()["outcome"]["status"], "active");
    assert_eq!(response.data()["battle"]["log_total"], 0);
}

#[tokio::test]
async fn test_tick_to_zero_ends_battle_for_opponent_on_tie() {
    let app = TestApp::new();
    let token = app.new_player_token();
    app.request(
        "POST",
        "/api/battles",
        Some(json!({ "duration_seconds": 30 })),
        Some(&token),
    )
    .await;

    let mut last = None;
    for _ in 0..30 {
        last = Some(
            app.request("POST", "/api/battles/active/tick", None, Some(&token))
                .await,
        );
    }
    let last = last.expect("ticked");

    assert_eq!(last.status, StatusCode::OK);
    assert_eq!(last.data()["outcome"]["time_remaining"], 0);
    assert_eq!(last.data()["outcome"]["status"], "completed");
    assert_eq!(last.data()["outcome"]["winner"], "opponent");
}

#[tokio::test]
async fn test_active_log_is_truncated() {
    let app = TestApp::with_rolls(vec![1; 24]);
    let token = app.new_player_token();
    app.start_battle(&token).await;

    for _ in 0..12 {
        assert_eq!(app.act(&token, "attack").await.status, StatusCode::OK);
    }

    let active = app
        .request("GET", "/api/battles/active", None, Some(&token))
        .await;
    let battle = active.data();
    assert_eq!(battle["log"].as_array().map(Vec::len), Some(10));
    assert_eq!(battle["log_total"], 12);
    assert_eq!(battle["log"][9]["opponent_health_after"], 88);
    assert_eq!(battle["log"][0]["opponent_health_after"], 97);
}

#[tokio::test]
async fn test_foreign_battle_is_not_found() {
    let app = TestApp::new();
    let owner = app.new_player_token();
    let id = app.start_battle(&owner).await;

    let stranger = app.new_player_token();
    let response = app
        .request("GET", &format!("/api/battles/{id}"), None, Some(&stranger))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let own = app
        .request("GET", &format!("/api/battles/{id}"), None, Some(&owner))
        .await;
    assert_eq!(own.status, StatusCode::OK);
}

#[tokio::test]
async fn test_players_battle_independently() {
    let app = TestApp::new();
    let first = app.new_player_token();
    let second = app.new_player_token();

    app.start_battle(&first).await;
    app.start_battle(&second).await;

    assert_eq!(app.act(&first, "surrender").await.status, StatusCode::OK);
    let other = app
        .request("GET", "/api/battles/active", None, Some(&second))
        .await;
    assert_eq!(other.data()["status"], "active");
}
