mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{DbContext, bearer};

#[tokio::test]
async fn api_key_lifecycle() {
    let Some(ctx) = DbContext::connect().await else {
        return;
    };
    let (user_id, token) = ctx.register_agent().await;

    let (name, value) = bearer(&token);
    let response = ctx
        .server
        .post("/api/merchant/api-keys")
        .add_header(name, value)
        .json(&json!({ "name": "生产环境", "permissions": ["orders:read", "wallet:read", "orders:read"] }))
        .await;
    response.assert_status_ok();
    let created: Value = response.json();
    let created = &created["resp_data"];
    let secret = created["secret"].as_str().unwrap();
    assert!(secret.starts_with("mk_"));
    assert!(created.get("api_key").is_none());
    assert_eq!(created["merchant_id"], user_id.to_string());
    assert_eq!(created["is_active"], true);
    assert_eq!(created["permissions"], json!(["orders:read", "wallet:read"]));
    assert!(secret.ends_with(created["key_suffix"].as_str().unwrap()));
    let key_id = created["id"].as_str().unwrap().to_string();

    let (name, value) = bearer(&token);
    let listed: Value = ctx
        .server
        .get("/api/merchant/api-keys")
        .add_header(name, value)
        .await
        .json();
    let keys = listed["resp_data"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].get("api_key").is_none());
    assert!(keys[0].get("secret").is_none());

    let (name, value) = bearer(&token);
    let response = ctx
        .server
        .put(&format!("/api/merchant/api-keys/{}/active", key_id))
        .add_header(name, value)
        .json(&json!({ "is_active": false }))
        .await;
    response.assert_status_ok();
    let toggled: Value = response.json();
    assert_eq!(toggled["resp_data"]["is_active"], false);

    let (name, value) = bearer(&token);
    ctx.server
        .delete(&format!("/api/merchant/api-keys/{}", key_id))
        .add_header(name, value)
        .await
        .assert_status_ok();

    let (name, value) = bearer(&token);
    let response = ctx
        .server
        .delete(&format!("/api/merchant/api-keys/{}", key_id))
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn keys_are_invisible_to_other_merchants() {
    let Some(ctx) = DbContext::connect().await else {
        return;
    };
    let (_, owner) = ctx.register_agent().await;
    let (_, other) = ctx.register_agent().await;

    let (name, value) = bearer(&owner);
    let created: Value = ctx
        .server
        .post("/api/merchant/api-keys")
        .add_header(name, value)
        .json(&json!({ "name": "测试" }))
        .await
        .json();
    let key_id = created["resp_data"]["id"].as_str().unwrap().to_string();

    let (name, value) = bearer(&other);
    let listed: Value = ctx
        .server
        .get("/api/merchant/api-keys")
        .add_header(name, value)
        .await
        .json();
    assert!(listed["resp_data"].as_array().unwrap().is_empty());

    let (name, value) = bearer(&other);
    ctx.server
        .put(&format!("/api/merchant/api-keys/{}/active", key_id))
        .add_header(name, value)
        .json(&json!({ "is_active": false }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let (name, value) = bearer(&other);
    ctx.server
        .delete(&format!("/api/merchant/api-keys/{}", key_id))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_permission_is_rejected() {
    let Some(ctx) = DbContext::connect().await else {
        return;
    };
    let (_, token) = ctx.register_agent().await;

    let (name, value) = bearer(&token);
    let response = ctx
        .server
        .post("/api/merchant/api-keys")
        .add_header(name, value)
        .json(&json!({ "name": "测试", "permissions": ["admin:all"] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["msg"], "未知权限: admin:all");
}
