mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

const ORGANIZER: &str = "org-alice";

#[tokio::test]
async fn test_bulk_add_is_idempotent() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Summer Party").await;
    let input = "Jane Doe, jane@x.com, confirmed\nJohn Doe, john@x.com";

    let first = app.bulk_add(ORGANIZER, &[&event_id], input).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["total_added"], 2);
    assert_eq!(first["total_skipped"], 0);
    assert_eq!(first["results"][0]["event_title"], "Summer Party");

    let second = app.bulk_add(ORGANIZER, &[&event_id], input).await;
    assert_eq!(second["total_added"], 0);
    assert_eq!(second["total_skipped"], 2);

    let guests = app.guests(ORGANIZER, &event_id).await;
    assert_eq!(guests.len(), 2);
    let jane = guests.iter().find(|g| g["email"] == "jane@x.com").unwrap();
    assert_eq!(jane["status"], "confirmed");
    assert!(!jane["responded_at"].is_null());
}

#[tokio::test]
async fn test_bulk_add_reports_rejected_rows() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Dinner").await;

    let body = app.bulk_add(ORGANIZER, &[&event_id], "Bob,not-an-email\nAlice,alice@x.com,confirmed").await;
    assert_eq!(body["total_added"], 1);

    let errors = body["parse_errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().starts_with("Row 1:"));
}

#[tokio::test]
async fn test_bulk_add_with_no_valid_rows_writes_nothing() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Dinner").await;

    let body = app.bulk_add(ORGANIZER, &[&event_id], "Bob,not-an-email").await;
    assert_eq!(body["success"], false);
    assert_eq!(body["total_added"], 0);
    assert!(app.guests(ORGANIZER, &event_id).await.is_empty());
}

#[tokio::test]
async fn test_bulk_add_dedupes_case_insensitively() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Gala").await;

    app.bulk_add(ORGANIZER, &[&event_id], "Jane, jane@x.com").await;
    let body = app.bulk_add(ORGANIZER, &[&event_id], "Jane Again, JANE@X.COM\nSam, sam@x.com\nSam Twice, Sam@x.com").await;

    assert_eq!(body["total_added"], 1);
    assert_eq!(body["total_skipped"], 2);
    assert_eq!(app.guests(ORGANIZER, &event_id).await.len(), 2);
}

#[tokio::test]
async fn test_bulk_add_isolates_failing_event() {
    let app = TestApp::new().await;
    let mine = app.create_event(ORGANIZER, "Mine").await;
    let theirs = app.create_event("org-bob", "Theirs").await;

    let body = app.bulk_add(ORGANIZER, &[&theirs, &mine], "Jane, jane@x.com").await;
    assert_eq!(body["success"], false);
    assert_eq!(body["progress"]["processed"], 2);
    assert_eq!(body["progress"]["total"], 2);
    let steps = body["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["processed"], 1);
    assert_eq!(steps[1]["processed"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["event_id"], theirs.as_str());
    assert!(results[0]["errors"][0].as_str().unwrap().contains("not found or you do not have permission"));
    assert_eq!(results[1]["added"], 1);

    assert!(app.guests("org-bob", &theirs).await.is_empty());
}

#[tokio::test]
async fn test_missing_organizer_header_is_unauthorized() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/v1/events", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = parse_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_manual_add_rejects_duplicate_email() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Launch").await;
    let uri = format!("/api/v1/events/{}/guests", event_id);

    let response = app.request("POST", &uri, Some(ORGANIZER), Some(json!({"name": "Jane", "email": "jane@x.com"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["data"]["status"], "pending");
    assert!(body["data"]["responded_at"].is_null());

    let response = app.request("POST", &uri, Some(ORGANIZER), Some(json!({"name": "Jane", "email": "Jane@X.com"}))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_body(response).await;
    assert_eq!(body["message"], "A guest with this email is already on the list");
}

#[tokio::test]
async fn test_manual_add_validation_is_reported_in_body() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Launch").await;
    let uri = format!("/api/v1/events/{}/guests", event_id);

    let response = app.request("POST", &uri, Some(ORGANIZER), Some(json!({"name": "Jane", "email": "jane", "status": "maybe"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("invalid email"));
}

#[tokio::test]
async fn test_update_status_stamps_and_clears_response_time() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Brunch").await;
    app.bulk_add(ORGANIZER, &[&event_id], "Jane, jane@x.com").await;
    let guest_id = app.guests(ORGANIZER, &event_id).await[0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/guests/{}", guest_id);

    let body = parse_body(app.request("PUT", &uri, Some(ORGANIZER), Some(json!({"status": "declined"}))).await).await;
    assert_eq!(body["data"]["status"], "declined");
    assert!(!body["data"]["responded_at"].is_null());

    let body = parse_body(app.request("PUT", &uri, Some(ORGANIZER), Some(json!({"status": "pending", "name": "Jane D."}))).await).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["name"], "Jane D.");
    assert!(body["data"]["responded_at"].is_null());
}

#[tokio::test]
async fn test_update_email_to_existing_guest_conflicts() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Brunch").await;
    app.bulk_add(ORGANIZER, &[&event_id], "Jane, jane@x.com\nJohn, john@x.com").await;
    let guests = app.guests(ORGANIZER, &event_id).await;
    let john = guests.iter().find(|g| g["email"] == "john@x.com").unwrap();
    let uri = format!("/api/v1/guests/{}", john["id"].as_str().unwrap());

    let response = app.request("PUT", &uri, Some(ORGANIZER), Some(json!({"email": "JANE@x.com"}))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_foreign_guest_looks_missing() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Private").await;
    app.bulk_add(ORGANIZER, &[&event_id], "Jane, jane@x.com").await;
    let guest_id = app.guests(ORGANIZER, &event_id).await[0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/guests/{}", guest_id);

    let foreign = app.request("DELETE", &uri, Some("org-mallory"), None).await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    let foreign_body = parse_body(foreign).await;

    let missing = app.request("DELETE", "/api/v1/guests/does-not-exist", Some("org-mallory"), None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_body(missing).await["message"], foreign_body["message"]);

    let own = app.request("DELETE", &uri, Some(ORGANIZER), None).await;
    assert_eq!(own.status(), StatusCode::OK);
    assert!(app.guests(ORGANIZER, &event_id).await.is_empty());
}

#[tokio::test]
async fn test_rsvp_upserts_by_email() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Wedding").await;
    app.bulk_add(ORGANIZER, &[&event_id], "Jane, jane@x.com").await;
    let uri = format!("/api/v1/events/{}/rsvp", event_id);

    let body = parse_body(app.request("POST", &uri, None, Some(json!({
        "name": "Jane", "email": "JANE@x.com", "status": "confirmed", "message": "Can't wait"
    }))).await).await;
    assert_eq!(body["success"], true);

    let body = parse_body(app.request("POST", &uri, None, Some(json!({
        "name": "Walk In", "email": "walkin@x.com", "status": "declined"
    }))).await).await;
    assert_eq!(body["data"]["status"], "declined");

    let guests = app.guests(ORGANIZER, &event_id).await;
    assert_eq!(guests.len(), 2);
    let jane = guests.iter().find(|g| g["email"] == "jane@x.com").unwrap();
    assert_eq!(jane["status"], "confirmed");
    assert_eq!(jane["message"], "Can't wait");
    assert!(!jane["responded_at"].is_null());

    let body = parse_body(app.request("POST", &uri, None, Some(json!({
        "name": "Jane", "email": "jane@x.com", "status": "pending"
    }))).await).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_status_filter_and_organizer_listing() {
    let app = TestApp::new().await;
    let first = app.create_event(ORGANIZER, "First").await;
    let second = app.create_event(ORGANIZER, "Second").await;
    let other = app.create_event("org-bob", "Other").await;
    app.bulk_add(ORGANIZER, &[&first], "Jane, jane@x.com, confirmed\nJohn, john@x.com").await;
    app.bulk_add(ORGANIZER, &[&second], "Ann, ann@x.com, declined").await;
    app.bulk_add("org-bob", &[&other], "Zed, zed@x.com").await;

    let uri = format!("/api/v1/events/{}/guests?status=confirmed", first);
    let body = parse_body(app.request("GET", &uri, Some(ORGANIZER), None).await).await;
    let confirmed = body["data"].as_array().unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0]["email"], "jane@x.com");

    let body = parse_body(app.request("GET", "/api/v1/guests", Some(ORGANIZER), None).await).await;
    let all = body["data"].as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|g| g["email"] != "zed@x.com"));
}

#[tokio::test]
async fn test_csv_import_then_export_preserves_values() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Reunion").await;

    let csv = "Name,Email,Status\nJane Doe,jane@x.com,confirmed\nJohn,john@x.com,declined\n";
    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/events/{}/guests/import?format=csv", event_id))
        .header("X-Organizer-Id", ORGANIZER)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv))
        .unwrap();
    let body = parse_body(app.router.clone().oneshot(req).await.unwrap()).await;
    assert_eq!(body["total_added"], 2);

    let uri = format!("/api/v1/events/{}/guests/export", event_id);
    let response = app.request("GET", &uri, Some(ORGANIZER), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let exported = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = exported.lines();
    assert_eq!(lines.next(), Some("Name,Email,Status,Response Date,Message,Created At"));

    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r.starts_with("Jane Doe,jane@x.com,confirmed,")));
    assert!(rows.iter().any(|r| r.starts_with("John,john@x.com,declined,")));
}

#[tokio::test]
async fn test_event_stats() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Stats").await;
    app.bulk_add(ORGANIZER, &[&event_id], "A, a@x.com, confirmed\nB, b@x.com, declined\nC, c@x.com\nD, d@x.com, confirmed").await;

    let uri = format!("/api/v1/events/{}/stats", event_id);
    let body = parse_body(app.request("GET", &uri, Some(ORGANIZER), None).await).await;
    let stats = &body["data"];
    assert_eq!(stats["total_guests"], 4);
    assert_eq!(stats["confirmed"], 2);
    assert_eq!(stats["declined"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["response_rate"], 75);
    assert_eq!(stats["capacity_remaining"], 48);
    assert_eq!(stats["communications_sent"], 0);
}
