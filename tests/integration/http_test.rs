//! Integration tests for the HTTP surface.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{FakeGenerator, REMOTE_PEER, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");

    let response = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["store"], "connected");
}

#[tokio::test]
async fn test_validate_reports_quota() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/license/validate",
            Some(json!({ "key": "lgk-demo-key" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], true);
    assert_eq!(
        response.body["license"],
        json!({ "active": true, "limit": 1000, "usage": 0, "remaining": 1000 })
    );
}

#[tokio::test]
async fn test_validate_rejections() {
    let app = TestApp::new().await;

    let unknown = app
        .request("POST", "/api/license/validate", Some(json!({ "key": "nope" })), None)
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["error"], "INVALID_KEY");

    let disabled = app
        .request(
            "POST",
            "/api/license/validate",
            Some(json!({ "key": "lgk-disabled-key" })),
            None,
        )
        .await;
    assert_eq!(disabled.status, StatusCode::FORBIDDEN);
    assert_eq!(disabled.body["message"], "License disabled");

    let missing = app
        .request("POST", "/api/license/validate", Some(json!({})), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "License key required");

    // Keys are case-sensitive.
    let shouting = app
        .request(
            "POST",
            "/api/license/validate",
            Some(json!({ "key": "LGK-DEMO-KEY" })),
            None,
        )
        .await;
    assert_eq!(shouting.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validate_does_not_consume_quota() {
    let app = TestApp::new().await;
    for _ in 0..3 {
        app.request(
            "POST",
            "/api/license/validate",
            Some(json!({ "key": "lgk-test-key" })),
            None,
        )
        .await;
    }
    assert_eq!(app.usage_of("lgk-test-key").await, 0);
}

#[tokio::test]
async fn test_generate_consumes_one_unit() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({ "prompt": "Tell me a story", "maxChars": 120 })),
            Some("lgk-test-key"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["reply"], "Once upon a time");
    assert_eq!(app.generator.calls(), 1);
    assert_eq!(app.usage_of("lgk-test-key").await, 1);

    let license = app
        .store
        .find_license_by_key("lgk-test-key")
        .await
        .unwrap()
        .unwrap();
    let events = app.store.usage_events_for(license.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].endpoint, "/api/generate");
    assert_eq!(Some(events[0].created_at), license.last_request_at);
}

#[tokio::test]
async fn test_generate_backend_failure_consumes_nothing() {
    for provider in ["sqlite", "memory"] {
        let app = TestApp::with_generator(provider, FakeGenerator::failing()).await;

        let response = app
            .request(
                "POST",
                "/api/generate",
                Some(json!({ "prompt": "hello" })),
                Some("lgk-test-key"),
            )
            .await;

        assert_eq!(response.status, StatusCode::BAD_GATEWAY, "{provider}");
        assert_eq!(response.body["message"], "Generation backend error");
        assert_eq!(app.generator.calls(), 1);
        assert_eq!(app.usage_of("lgk-test-key").await, 0, "{provider}");
    }
}

#[tokio::test]
async fn test_generate_requires_key_header() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/generate", Some(json!({ "prompt": "hello" })), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "License key missing");
    assert_eq!(app.generator.calls(), 0);
}

#[tokio::test]
async fn test_generate_rejects_disabled_and_unknown_keys() {
    let app = TestApp::new().await;

    let disabled = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({ "prompt": "hello" })),
            Some("lgk-disabled-key"),
        )
        .await;
    assert_eq!(disabled.status, StatusCode::FORBIDDEN);
    assert_eq!(disabled.body["error"], "DISABLED");

    let unknown = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({ "prompt": "hello" })),
            Some("lgk-unknown"),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.generator.calls(), 0);
}

#[tokio::test]
async fn test_generate_rejects_invalid_body() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({ "prompt": "hello", "temperature": 3.5 })),
            Some("lgk-test-key"),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_INPUT");
    assert_eq!(app.generator.calls(), 0);
    assert_eq!(app.usage_of("lgk-test-key").await, 0);
}

#[tokio::test]
async fn test_generate_stops_at_limit() {
    let app = TestApp::new().await;

    let created = app
        .request(
            "POST",
            "/api/admin/license/create",
            Some(json!({ "key": "two-shot", "limit": 2 })),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let response = app
            .request(
                "POST",
                "/api/generate",
                Some(json!({ "prompt": "hello" })),
                Some("two-shot"),
            )
            .await;
        statuses.push(response.status);
    }

    assert_eq!(
        statuses,
        vec![StatusCode::OK, StatusCode::OK, StatusCode::FORBIDDEN]
    );
    assert_eq!(app.generator.calls(), 2);
    assert_eq!(app.usage_of("two-shot").await, 2);

    let validate = app
        .request(
            "POST",
            "/api/license/validate",
            Some(json!({ "key": "two-shot" })),
            None,
        )
        .await;
    assert_eq!(validate.status, StatusCode::FORBIDDEN);
    assert_eq!(validate.body["message"], "License limit exceeded");

    let shrink = app
        .request(
            "POST",
            "/api/admin/license/update",
            Some(json!({ "key": "two-shot", "limit": 1 })),
            None,
        )
        .await;
    assert_eq!(shrink.status, StatusCode::BAD_REQUEST);
    assert_eq!(shrink.body["error"], "INVALID_INPUT");
    assert_eq!(app.usage_of("two-shot").await, 2);
}

#[tokio::test]
async fn test_admin_routes_refuse_remote_peers() {
    let app = TestApp::new().await;

    for (method, path) in [
        ("POST", "/api/admin/license/create"),
        ("POST", "/api/admin/license/update"),
        ("GET", "/api/admin/licenses"),
        ("GET", "/api/admin/dashboard"),
    ] {
        let body = (method == "POST").then(|| json!({ "key": "sneaky", "limit": 10 }));
        let response = app
            .request_from(REMOTE_PEER, method, path, body, None)
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(response.body["error"], "FORBIDDEN");
    }

    assert!(app.store.find_license_by_key("sneaky").await.unwrap().is_none());
}

#[tokio::test]
async fn test_admin_routes_accept_ipv6_loopback() {
    let app = TestApp::new().await;
    let response = app
        .request_from("[::1]:40000", "GET", "/api/admin/licenses", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_create_license() {
    let app = TestApp::new().await;

    let explicit = app
        .request(
            "POST",
            "/api/admin/license/create",
            Some(json!({ "key": "team-a", "limit": "25", "active": "false" })),
            None,
        )
        .await;
    assert_eq!(explicit.status, StatusCode::OK);
    assert_eq!(explicit.body["key"], "team-a");
    assert_eq!(explicit.body["limit"], 25);
    assert_eq!(explicit.body["active"], false);
    assert_eq!(explicit.body["usage"], 0);
    assert!(explicit.body["lastRequestAt"].is_null());

    let generated = app
        .request("POST", "/api/admin/license/create", Some(json!({})), None)
        .await;
    assert_eq!(generated.status, StatusCode::OK);
    let key = generated.body["key"].as_str().unwrap();
    assert!(key.starts_with("lgk-"));
    assert_eq!(key.len(), "lgk-".len() + 32);
    assert_eq!(generated.body["limit"], 500);
    assert_eq!(generated.body["active"], true);

    let duplicate = app
        .request(
            "POST",
            "/api/admin/license/create",
            Some(json!({ "key": "team-a", "limit": 99 })),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["error"], "DUPLICATE_KEY");
}

#[tokio::test]
async fn test_admin_create_rejects_bad_fields() {
    let app = TestApp::new().await;

    for body in [
        json!({ "key": "bad", "limit": -1 }),
        json!({ "key": "bad", "limit": 1.5 }),
        json!({ "key": "bad", "limit": "many" }),
        json!({ "key": "bad", "active": "maybe" }),
    ] {
        let response = app
            .request("POST", "/api/admin/license/create", Some(body.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
    }

    assert!(app.store.find_license_by_key("bad").await.unwrap().is_none());
}

#[tokio::test]
async fn test_admin_update_license() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/admin/license/update",
            Some(json!({ "key": "lgk-test-key", "limit": 5, "active": null })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["limit"], 5);
    assert_eq!(response.body["active"], true);

    let enable = app
        .request(
            "POST",
            "/api/admin/license/update",
            Some(json!({ "key": "lgk-disabled-key", "active": 1, "limit": 3 })),
            None,
        )
        .await;
    assert_eq!(enable.status, StatusCode::OK);
    assert_eq!(enable.body["active"], true);

    let generate = app
        .request(
            "POST",
            "/api/generate",
            Some(json!({ "prompt": "now it works" })),
            Some("lgk-disabled-key"),
        )
        .await;
    assert_eq!(generate.status, StatusCode::OK);

    let missing_key = app
        .request("POST", "/api/admin/license/update", Some(json!({ "limit": 5 })), None)
        .await;
    assert_eq!(missing_key.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .request(
            "POST",
            "/api/admin/license/update",
            Some(json!({ "key": "ghost", "limit": 5 })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_list_newest_first() {
    let app = TestApp::new().await;

    app.request(
        "POST",
        "/api/admin/license/create",
        Some(json!({ "key": "newest", "limit": 1 })),
        None,
    )
    .await;

    let response = app.request("GET", "/api/admin/licenses", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let keys: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys.len(), 4);
    assert_eq!(keys[0], "newest");
}

#[tokio::test]
async fn test_admin_dashboard() {
    let app = TestApp::new().await;

    for _ in 0..2 {
        let response = app
            .request(
                "POST",
                "/api/generate",
                Some(json!({ "prompt": "hello" })),
                Some("lgk-demo-key"),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app.request("GET", "/api/admin/dashboard", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = &response.body;
    assert_eq!(body["totalKeys"], 3);
    assert_eq!(body["activeKeys"], 2);
    assert_eq!(body["inactiveKeys"], 1);
    assert_eq!(body["keys"].as_array().unwrap().len(), 3);
    assert_eq!(body["serverStats"]["totalRequests"], 2);
    assert_eq!(body["serverStats"]["requestsToday"], 2);
    assert_eq!(
        body["serverStats"]["requestsPerKey"],
        json!({ "lgk-demo-key": 2 })
    );
    assert!(body["serverStats"]["lastActivity"].is_string());
}
