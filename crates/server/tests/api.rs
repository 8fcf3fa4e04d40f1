use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{LocalDeployment, app_router};
use services::services::{
    config::Config,
    fixtures::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD},
};
use tower::ServiceExt;

async fn demo_router() -> Router {
    let deployment = LocalDeployment::new(Config::default())
        .await
        .expect("deployment");
    app_router(&deployment).with_state(deployment)
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn login(router: &Router, path: &str, email: &str, password: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        path,
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn dashboard_login_and_client_listing() {
    let router = demo_router().await;
    let token = login(&router, "/api/auth/login", DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await;

    let (status, body) = send(&router, "GET", "/api/clients/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"].as_array().expect("array").len(), 1);

    let (status, _) = send(&router, "GET", "/api/clients/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn colliding_contact_details_are_rejected() {
    let router = demo_router().await;
    let token = login(&router, "/api/auth/login", DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await;

    let (status, _) = send(
        &router,
        "POST",
        "/api/clients/",
        Some(&token),
        Some(json!({
            "name": "Original",
            "email": "dupe@example.com",
            "phone": "+237 670 00 00 01",
            "address": null,
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same email in different casing and spacing collides.
    let (status, body) = send(
        &router,
        "POST",
        "/api/clients/",
        Some(&token),
        Some(json!({
            "name": "Copycat",
            "email": "  Dupe@Example.COM ",
            "phone": null,
            "address": null,
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));

    let (status, body) = send(
        &router,
        "POST",
        "/api/clients/",
        Some(&token),
        Some(json!({
            "name": "Third",
            "email": null,
            "phone": "+237680000002",
            "address": null,
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let third_id = body["data"]["id"].as_str().expect("id").to_string();

    // Updating another client onto the taken phone collides too, even with
    // different formatting.
    let (status, _) = send(
        &router,
        "PUT",
        &format!("/api/clients/{third_id}"),
        Some(&token),
        Some(json!({
            "name": "Third",
            "email": null,
            "phone": "+237-670-00-00-01",
            "address": null,
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A client keeping its own contact details is not a collision.
    let (status, _) = send(
        &router,
        "PUT",
        &format!("/api/clients/{third_id}"),
        Some(&token),
        Some(json!({
            "name": "Third, renamed",
            "email": null,
            "phone": "+237 680 00 00 02",
            "address": null,
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn permission_tags_gate_the_module_trees() {
    let router = demo_router().await;
    let token = login(&router, "/api/auth/login", "manager@demo.local", "manager").await;

    // The manager role carries every department tag but not accounts.
    let (status, _) = send(&router, "GET", "/api/clients/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&router, "GET", "/api/accounts/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn portal_sessions_stay_on_the_portal_tree() {
    let router = demo_router().await;
    let token = login(&router, "/api/portal/login", "amina@example.com", "portal").await;

    let (status, body) = send(&router, "GET", "/api/portal/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Amina Toko"));

    let (status, body) = send(
        &router,
        "PUT",
        "/api/portal/me",
        Some(&token),
        Some(json!({
            "name": "Amina Toko",
            "email": "amina@example.com",
            "phone": "+237677889900",
            "address": "Bali, Douala",
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["address"], json!("Bali, Douala"));

    // A portal token is not a dashboard session.
    let (status, _) = send(&router, "GET", "/api/clients/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sync_fetch_and_noop_reconcile() {
    let router = demo_router().await;
    let token = login(&router, "/api/auth/login", DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await;

    let (status, body) = send(&router, "GET", "/api/sync/clients", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].clone();
    assert_eq!(rows.as_array().expect("rows").len(), 1);

    let (status, body) = send(&router, "PUT", "/api/sync/clients", Some(&token), Some(rows)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["upserted"], json!(0));
    assert_eq!(body["data"]["deleted"], json!(0));

    let (status, _) = send(&router, "GET", "/api/sync/unknown_table", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purge_is_admin_only_and_archived_only() {
    let router = demo_router().await;
    let admin = login(&router, "/api/auth/login", DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await;
    let manager = login(&router, "/api/auth/login", "manager@demo.local", "manager").await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/clients/",
        Some(&admin),
        Some(json!({
            "name": "Ephemeral",
            "email": null,
            "phone": null,
            "address": null,
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().expect("id").to_string();

    // Live rows refuse to purge.
    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/admin/purge/clients/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &router,
        "POST",
        &format!("/api/clients/{id}/archive"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/admin/purge/clients/{id}"),
        Some(&manager),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/admin/purge/clients/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, "GET", &format!("/api/clients/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
