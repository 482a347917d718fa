//! Contact-form inquiries.

use serde_json::{Value, json};

use safar_integration_tests::TestApp;
use safar_server::models::Principal;

fn submission(name: &str) -> Value {
    json!({
        "name": name,
        "email": " Visitor@Example.COM ",
        "phone": "+44 20 7946 0000",
        "message": "Looking for a family Umrah package in December",
        "travelers": 4,
        "preferredDate": "2026-12-10"
    })
}

async fn submit(app: &TestApp, body: Value) -> String {
    let response = app.post("/api/inquiries", None, body).await;
    assert_eq!(response.status, 200, "{:?}", response.body);
    response.body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_public_submission_is_stored_pending() {
    let app = TestApp::new();

    let mut body = submission("Yusuf");
    body["status"] = json!("closed");
    body["notes"] = json!("sneaky");
    let id = submit(&app, body).await;

    let admin = app.sign_in_superuser().await;
    let one = app.get_as(&format!("/api/inquiries?id={id}"), &admin).await;
    assert_eq!(one.status, 200);
    assert_eq!(one.body["status"], "pending");
    assert_eq!(one.body["email"], "visitor@example.com");
    assert_eq!(one.body["travelers"], 4);
    assert!(one.body.get("notes").is_none());
}

#[tokio::test]
async fn test_signed_in_visitor_can_submit() {
    let app = TestApp::new();
    let visitor = app.sign_in(&Principal::with_email("pilgrim@example.com")).await;

    let response = app
        .post("/api/inquiries", Some(&visitor), submission("Maryam"))
        .await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_invalid_submission_is_400() {
    let app = TestApp::new();

    let mut body = submission("Yusuf");
    body["email"] = json!("not-an-email");
    let response = app.post("/api/inquiries", None, body).await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "Invalid email address"}));

    let mut body = submission("Yusuf");
    body["message"] = json!("   ");
    let response = app.post("/api/inquiries", None, body).await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "message is required"}));
}

#[tokio::test]
async fn test_list_is_admin_only_and_newest_first() {
    let app = TestApp::new();
    submit(&app, submission("First")).await;
    submit(&app, submission("Second")).await;
    submit(&app, submission("Third")).await;

    assert_eq!(app.get("/api/inquiries").await.status, 401);

    let admin = app.sign_in_superuser().await;
    let list = app.get_as("/api/inquiries", &admin).await;
    assert_eq!(list.status, 200);
    let names: Vec<&str> = list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_status_update_and_filter() {
    let app = TestApp::new();
    let first = submit(&app, submission("First")).await;
    submit(&app, submission("Second")).await;
    let admin = app.sign_in_superuser().await;

    let response = app
        .put(
            &format!("/api/inquiries?id={first}"),
            Some(&admin),
            json!({"status": "contacted", "notes": "Called back on Monday"}),
        )
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"success": true, "id": first}));

    let contacted = app.get_as("/api/inquiries?status=contacted", &admin).await;
    let items = contacted.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], first.as_str());
    assert_eq!(items[0]["notes"], "Called back on Monday");
    assert_eq!(items[0]["name"], "First");

    let pending = app.get_as("/api/inquiries?status=pending", &admin).await;
    assert_eq!(pending.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_errors() {
    let app = TestApp::new();
    let id = submit(&app, submission("First")).await;
    let admin = app.sign_in_superuser().await;

    let response = app
        .put("/api/inquiries", Some(&admin), json!({"status": "closed"}))
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "Missing id"}));

    let response = app
        .put(&format!("/api/inquiries?id={id}"), Some(&admin), json!({}))
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "Nothing to update"}));

    let response = app
        .put(
            &format!("/api/inquiries?id={id}"),
            Some(&admin),
            json!({"status": "archived"}),
        )
        .await;
    assert_eq!(response.status, 400);

    let response = app
        .put(
            "/api/inquiries?id=missing",
            Some(&admin),
            json!({"status": "closed"}),
        )
        .await;
    assert_eq!(response.status, 404);
    assert_eq!(response.body, json!({"error": "Inquiry not found"}));

    let response = app
        .get_as("/api/inquiries?status=archived", &admin)
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"error": "Invalid status: archived"}));
}

#[tokio::test]
async fn test_non_admin_cannot_update() {
    let app = TestApp::new();
    let id = submit(&app, submission("First")).await;
    let visitor = app.sign_in(&Principal::with_email("pilgrim@example.com")).await;

    let response = app
        .put(
            &format!("/api/inquiries?id={id}"),
            Some(&visitor),
            json!({"status": "closed"}),
        )
        .await;
    assert_eq!(response.status, 401);

    let admin = app.sign_in_superuser().await;
    let one = app.get_as(&format!("/api/inquiries?id={id}"), &admin).await;
    assert_eq!(one.body["status"], "pending");
}
