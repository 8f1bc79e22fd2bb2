//! Integration tests for the admin reporting endpoints.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use emporia::config::Config;
use emporia::entities::users;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;
use tower::ServiceExt;

/// Default credentials seeded by migration (must match m20250715_initial.rs)
const DEFAULT_API_KEY: &str = "emporia_default_api_key_please_regenerate";
const DEFAULT_ADMIN_EMAIL: &str = "admin@emporia.local";

async fn spawn_app() -> (Arc<emporia::api::AppState>, Router) {
    let db_path = std::env::temp_dir().join(format!("emporia-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = emporia::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let router = emporia::api::router(state.clone()).await;
    (state, router)
}

struct SeedUser<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    phone: Option<&'a str>,
    role: &'a str,
    is_active: bool,
    created_minutes_ago: i64,
    last_login_minutes_ago: Option<i64>,
}

impl Default for SeedUser<'_> {
    fn default() -> Self {
        Self {
            email: "user@shop.test",
            first_name: "Test",
            last_name: "User",
            phone: None,
            role: "customer",
            is_active: true,
            created_minutes_ago: 0,
            last_login_minutes_ago: None,
        }
    }
}

async fn seed_user(state: &emporia::api::AppState, seed: SeedUser<'_>) -> String {
    let now = chrono::Utc::now();
    let created = (now - chrono::Duration::minutes(seed.created_minutes_ago)).to_rfc3339();
    let id = uuid::Uuid::new_v4().to_string();

    let model = users::ActiveModel {
        id: Set(id.clone()),
        email: Set(seed.email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        api_key: Set(format!("test-key-{id}")),
        first_name: Set(seed.first_name.to_string()),
        last_name: Set(seed.last_name.to_string()),
        phone: Set(seed.phone.map(str::to_string)),
        role: Set(seed.role.to_string()),
        is_active: Set(seed.is_active),
        last_login: Set(seed
            .last_login_minutes_ago
            .map(|m| (now - chrono::Duration::minutes(m)).to_rfc3339())),
        email_verification_token: Set(Some("verify-secret".to_string())),
        password_reset_token: Set(Some("reset-secret".to_string())),
        password_reset_expires: Set(Some(now.to_rfc3339())),
        created_at: Set(created.clone()),
        updated_at: Set(created),
    };

    model
        .insert(&state.store().conn)
        .await
        .expect("failed to seed user");

    id
}

/// Pushes the bootstrap admin out of the analytics windows so scenario
/// expectations only depend on seeded rows.
async fn backdate_bootstrap_admin(state: &emporia::api::AppState, days: i64) -> String {
    let admin = state
        .store()
        .get_user_by_email(DEFAULT_ADMIN_EMAIL)
        .await
        .expect("failed to fetch bootstrap admin")
        .expect("missing bootstrap admin");

    let id = admin.id.clone();
    let backdated = (chrono::Utc::now() - chrono::Duration::days(days)).to_rfc3339();

    let mut active: users::ActiveModel = admin.into();
    active.created_at = Set(backdated.clone());
    active.last_login = Set(Some(backdated));
    active
        .update(&state.store().conn)
        .await
        .expect("failed to backdate admin");

    id
}

async fn get_json(app: &Router, uri: &str, api_key: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("X-Api-Key", api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

async fn patch_json(
    app: &Router,
    uri: &str,
    api_key: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(uri)
                .header("X-Api-Key", api_key)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_admin_routes_require_auth_and_role() {
    let (state, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = get_json(&app, "/api/admin/users", "wrong-key").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let customer_id = seed_user(
        &state,
        SeedUser {
            email: "shopper@shop.test",
            ..Default::default()
        },
    )
    .await;

    let (status, body) =
        get_json(&app, "/api/admin/users", &format!("test-key-{customer_id}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = get_json(&app, "/api/admin/users", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_analytics_summary() {
    let (state, app) = spawn_app().await;

    // Bootstrap admin: created 40 days ago, last login 40 days ago
    backdate_bootstrap_admin(&state, 40).await;

    seed_user(
        &state,
        SeedUser {
            email: "new-customer@shop.test",
            role: "customer",
            created_minutes_ago: 24 * 60,
            last_login_minutes_ago: Some(24 * 60),
            ..Default::default()
        },
    )
    .await;

    seed_user(
        &state,
        SeedUser {
            email: "new-driver@shop.test",
            role: "driver",
            created_minutes_ago: 24 * 60,
            last_login_minutes_ago: Some(2 * 24 * 60),
            ..Default::default()
        },
    )
    .await;

    let (status, body) = get_json(&app, "/api/admin/analytics/users", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);

    // Bare payload: the summary object itself, no envelope
    assert!(body.get("success").is_none());
    assert_eq!(body["totalUsers"], 3);
    assert_eq!(body["newUsersLast7Days"], 2);
    assert_eq!(body["activeUsers"], 2);
    assert_eq!(body["usersByPlan"]["free"], 1);
    assert_eq!(body["usersByPlan"]["premium"], 1);
    assert_eq!(body["usersByPlan"]["enterprise"], 1);
    assert_eq!(body["recentActivity"], serde_json::json!([]));
}

#[tokio::test]
async fn test_analytics_counts_unrecognized_roles_in_total_only() {
    let (state, app) = spawn_app().await;
    backdate_bootstrap_admin(&state, 40).await;

    seed_user(
        &state,
        SeedUser {
            email: "warehouse@shop.test",
            role: "warehouse_bot",
            ..Default::default()
        },
    )
    .await;

    let (status, body) = get_json(&app, "/api/admin/analytics/users", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["totalUsers"], 2);
    let plans = &body["usersByPlan"];
    assert_eq!(plans["free"], 0);
    assert_eq!(plans["premium"], 0);
    assert_eq!(plans["enterprise"], 1);
}

#[tokio::test]
async fn test_list_users_pagination() {
    let (state, app) = spawn_app().await;

    for i in 0..25 {
        seed_user(
            &state,
            SeedUser {
                email: &format!("user{i:02}@shop.test"),
                created_minutes_ago: i,
                ..Default::default()
            },
        )
        .await;
    }

    let (status, body) = get_json(
        &app,
        "/api/admin/users?page=2&limit=10&role=customer",
        DEFAULT_API_KEY,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["success"], true);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(body["pagination"]["total"], 25);
    assert_eq!(body["pagination"]["pages"], 3);

    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 10);

    // Newest first: page 2 holds items 11-20 of the descending order
    let emails: Vec<&str> = items.iter().map(|u| u["email"].as_str().unwrap()).collect();
    let expected: Vec<String> = (10..20).map(|i| format!("user{i:02}@shop.test")).collect();
    assert_eq!(emails, expected);
}

#[tokio::test]
async fn test_list_users_filters_role_and_status() {
    let (state, app) = spawn_app().await;

    seed_user(
        &state,
        SeedUser {
            email: "suspended-admin@shop.test",
            role: "admin",
            is_active: false,
            ..Default::default()
        },
    )
    .await;
    seed_user(
        &state,
        SeedUser {
            email: "suspended-customer@shop.test",
            is_active: false,
            ..Default::default()
        },
    )
    .await;
    seed_user(
        &state,
        SeedUser {
            email: "active-customer@shop.test",
            ..Default::default()
        },
    )
    .await;

    let (status, body) = get_json(
        &app,
        "/api/admin/users?role=admin&isActive=false",
        DEFAULT_API_KEY,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    for item in items {
        assert_eq!(item["role"], "admin");
        assert_eq!(item["isActive"], false);
    }
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_list_users_search_matches_any_identity_field() {
    let (state, app) = spawn_app().await;

    seed_user(
        &state,
        SeedUser {
            email: "a@shop.test",
            first_name: "Foobar",
            ..Default::default()
        },
    )
    .await;
    seed_user(
        &state,
        SeedUser {
            email: "b@shop.test",
            last_name: "Defoore",
            ..Default::default()
        },
    )
    .await;
    seed_user(
        &state,
        SeedUser {
            email: "big.FOO@shop.test",
            ..Default::default()
        },
    )
    .await;
    seed_user(
        &state,
        SeedUser {
            email: "d@shop.test",
            phone: Some("+1-555-foo-0199"),
            ..Default::default()
        },
    )
    .await;
    seed_user(
        &state,
        SeedUser {
            email: "unrelated@shop.test",
            first_name: "Grace",
            last_name: "Hopper",
            ..Default::default()
        },
    )
    .await;

    let (status, body) = get_json(&app, "/api/admin/users?search=foo", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);

    let mut emails: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    emails.sort_unstable();

    assert_eq!(
        emails,
        vec![
            "a@shop.test",
            "b@shop.test",
            "big.FOO@shop.test",
            "d@shop.test"
        ]
    );
}

#[tokio::test]
async fn test_list_users_never_exposes_sensitive_fields() {
    let (state, app) = spawn_app().await;

    seed_user(
        &state,
        SeedUser {
            email: "leaky@shop.test",
            ..Default::default()
        },
    )
    .await;

    let (status, body) = get_json(&app, "/api/admin/users", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);

    for item in body["data"].as_array().unwrap() {
        let obj = item.as_object().unwrap();
        for forbidden in [
            "password",
            "passwordHash",
            "password_hash",
            "apiKey",
            "api_key",
            "emailVerificationToken",
            "passwordResetToken",
            "passwordResetExpires",
        ] {
            assert!(
                !obj.contains_key(forbidden),
                "list response leaked '{forbidden}'"
            );
        }
    }
}

#[tokio::test]
async fn test_list_users_rejects_malformed_query() {
    let (_state, app) = spawn_app().await;

    for uri in [
        "/api/admin/users?page=abc",
        "/api/admin/users?page=0",
        "/api/admin/users?limit=nope",
        "/api/admin/users?limit=0",
        "/api/admin/users?isActive=banana",
    ] {
        let (status, body) = get_json(&app, uri, DEFAULT_API_KEY).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expected 400 for {uri}");
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_status_toggle_requires_boolean() {
    let (state, app) = spawn_app().await;

    let target = seed_user(
        &state,
        SeedUser {
            email: "target@shop.test",
            ..Default::default()
        },
    )
    .await;

    let (status, body) = patch_json(
        &app,
        &format!("/api/admin/users/{target}/status"),
        DEFAULT_API_KEY,
        &serde_json::json!({ "isActive": "yes" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "isActive must be a boolean value");
}

#[tokio::test]
async fn test_status_toggle_rejects_own_account() {
    let (state, app) = spawn_app().await;

    let admin = state
        .store()
        .get_user_by_email(DEFAULT_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();

    for requested in [true, false] {
        let (status, body) = patch_json(
            &app,
            &format!("/api/admin/users/{}/status", admin.id),
            DEFAULT_API_KEY,
            &serde_json::json!({ "isActive": requested }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Cannot update your own status");
    }

    // Still active: the guard fired before any write
    let admin = state
        .store()
        .get_user_by_email(DEFAULT_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert!(admin.is_active);
}

#[tokio::test]
async fn test_status_toggle_unknown_user_is_404() {
    let (_state, app) = spawn_app().await;

    let (status, body) = patch_json(
        &app,
        &format!("/api/admin/users/{}/status", uuid::Uuid::new_v4()),
        DEFAULT_API_KEY,
        &serde_json::json!({ "isActive": false }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_status_toggle_success_returns_minimal_fields() {
    let (state, app) = spawn_app().await;

    let target = seed_user(
        &state,
        SeedUser {
            email: "deactivate-me@shop.test",
            ..Default::default()
        },
    )
    .await;

    let (status, body) = patch_json(
        &app,
        &format!("/api/admin/users/{target}/status"),
        DEFAULT_API_KEY,
        &serde_json::json!({ "isActive": false }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User deactivated successfully");

    let data = body["data"].as_object().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data["_id"], target);
    assert_eq!(data["email"], "deactivate-me@shop.test");
    assert_eq!(data["isActive"], false);

    let stored = state.store().get_user_by_id(&target).await.unwrap().unwrap();
    assert!(!stored.is_active);

    // Idempotent in effect: repeating the same toggle is a no-op change
    let (status, _) = patch_json(
        &app,
        &format!("/api/admin/users/{target}/status"),
        DEFAULT_API_KEY,
        &serde_json::json!({ "isActive": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_establishes_identity() {
    let (_state, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": DEFAULT_ADMIN_EMAIL,
                        "password": "password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], DEFAULT_ADMIN_EMAIL);
    assert_eq!(json["data"]["apiKey"], DEFAULT_API_KEY);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": DEFAULT_ADMIN_EMAIL,
                        "password": "wrong-password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
