//! Allowlist management through `/api/admin/seed`.

use serde_json::json;

use safar_integration_tests::{SUPERUSER, TestApp};
use safar_server::models::Principal;

async fn is_admin(app: &TestApp, cookie: &str) -> bool {
    app.get_as("/api/admin/is-admin", cookie).await.body["isAdmin"]
        .as_bool()
        .unwrap()
}

#[tokio::test]
async fn test_allow_then_revoke() {
    let app = TestApp::new();
    let owner = app.sign_in_superuser().await;
    let ops = app.sign_in(&Principal::with_email("ops@safar.test")).await;
    assert!(!is_admin(&app, &ops).await);

    let response = app
        .post(
            "/api/admin/seed",
            Some(&owner),
            json!({"email": " OPS@Safar.test "}),
        )
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"success": true, "id": "ops@safar.test"}));
    assert!(is_admin(&app, &ops).await);

    // A delegated admin can read the allowlist
    let list = app.get_as("/api/admin/seed", &ops).await;
    assert_eq!(list.status, 200);
    let entries = list.body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "ops@safar.test");
    assert_eq!(entries[0]["email"], "ops@safar.test");
    assert_eq!(entries[0]["createdBy"], SUPERUSER);

    let response = app
        .delete("/api/admin/seed?email=ops@safar.test", Some(&owner))
        .await;
    assert_eq!(response.status, 200);
    assert!(!is_admin(&app, &ops).await);
}

#[tokio::test]
async fn test_revoke_email_from_body() {
    let app = TestApp::new();
    let owner = app.sign_in_superuser().await;
    app.post("/api/admin/seed", Some(&owner), json!({"email": "ops@safar.test"}))
        .await;

    let response = app
        .send(
            axum::http::Method::DELETE,
            "/api/admin/seed",
            Some(&owner),
            Some(json!({"email": "ops@safar.test"})),
        )
        .await;
    assert_eq!(response.status, 200);

    let list = app.get_as("/api/admin/seed", &owner).await;
    assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn test_allow_twice_keeps_one_entry() {
    let app = TestApp::new();
    let owner = app.sign_in_superuser().await;

    for _ in 0..2 {
        let response = app
            .post("/api/admin/seed", Some(&owner), json!({"email": "ops@safar.test"}))
            .await;
        assert_eq!(response.status, 200);
    }

    let list = app.get_as("/api/admin/seed", &owner).await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_revoking_absent_email_succeeds() {
    let app = TestApp::new();
    let owner = app.sign_in_superuser().await;

    let response = app
        .delete("/api/admin/seed?email=nobody@safar.test", Some(&owner))
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["success"], true);
}

#[tokio::test]
async fn test_bad_email_requests() {
    let app = TestApp::new();
    let owner = app.sign_in_superuser().await;

    let response = app.post("/api/admin/seed", Some(&owner), json!({})).await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "Missing email"}));

    let response = app
        .post("/api/admin/seed", Some(&owner), json!({"email": "not-an-email"}))
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "Invalid email address"}));

    let response = app.delete("/api/admin/seed", Some(&owner)).await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "Missing email"}));
}

#[tokio::test]
async fn test_allowlist_requires_admin() {
    let app = TestApp::new();
    let visitor = app.sign_in(&Principal::with_email("pilgrim@example.com")).await;

    let response = app
        .post(
            "/api/admin/seed",
            Some(&visitor),
            json!({"email": "pilgrim@example.com"}),
        )
        .await;
    assert_eq!(response.status, 401);
    assert!(!is_admin(&app, &visitor).await);

    assert_eq!(app.get("/api/admin/seed").await.status, 401);
}
