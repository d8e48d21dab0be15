mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::{json, Value};

const ORGANIZER: &str = "org-alice";

async fn create_poll(app: &TestApp, event_id: &str, options: Value) -> Value {
    let uri = format!("/api/v1/events/{}/polls", event_id);
    let response = app.request("POST", &uri, Some(ORGANIZER), Some(json!({
        "question": "Will you bring a plus one?",
        "options": options
    }))).await;
    parse_body(response).await
}

async fn answer(app: &TestApp, poll_id: &str, payload: Value) -> Value {
    let uri = format!("/api/v1/polls/{}/responses", poll_id);
    parse_body(app.request("POST", &uri, None, Some(payload)).await).await
}

#[tokio::test]
async fn test_poll_results_scenario() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Picnic").await;
    app.bulk_add(ORGANIZER, &[&event_id], "A, a@x.com\nB, b@x.com\nC, c@x.com").await;

    let poll = create_poll(&app, &event_id, json!(["Yes", "No"])).await;
    assert_eq!(poll["success"], true);
    let poll_id = poll["data"]["id"].as_str().unwrap().to_string();

    let empty = parse_body(app.request("GET", &format!("/api/v1/polls/{}/results", poll_id), None, None).await).await;
    assert_eq!(empty["data"]["total_responses"], 0);
    assert!(empty["data"]["results"].as_array().unwrap().iter().all(|r| r["percentage"] == 0));

    assert_eq!(answer(&app, &poll_id, json!({"email": "a@x.com", "option": "Yes"})).await["success"], true);
    assert_eq!(answer(&app, &poll_id, json!({"email": "B@X.com", "option": 0})).await["success"], true);
    assert_eq!(answer(&app, &poll_id, json!({"email": "c@x.com", "option": "no"})).await["success"], true);

    let body = parse_body(app.request("GET", &format!("/api/v1/polls/{}/results", poll_id), None, None).await).await;
    assert_eq!(body["data"]["total_responses"], 3);
    assert_eq!(body["data"]["results"], json!([
        {"option": "Yes", "count": 2, "percentage": 67},
        {"option": "No", "count": 1, "percentage": 33}
    ]));
}

#[tokio::test]
async fn test_second_answer_replaces_first() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Picnic").await;
    app.bulk_add(ORGANIZER, &[&event_id], "A, a@x.com").await;
    let guest_id = app.guests(ORGANIZER, &event_id).await[0]["id"].as_str().unwrap().to_string();

    let poll = create_poll(&app, &event_id, json!(["Yes", "No", "Maybe"])).await;
    let poll_id = poll["data"]["id"].as_str().unwrap().to_string();

    answer(&app, &poll_id, json!({"guest_id": guest_id, "option": "Yes"})).await;
    let second = answer(&app, &poll_id, json!({"guest_id": guest_id, "option": 2})).await;
    assert_eq!(second["data"]["selected_option"], "Maybe");

    let body = parse_body(app.request("GET", &format!("/api/v1/polls/{}/results", poll_id), None, None).await).await;
    assert_eq!(body["data"]["total_responses"], 1);
    assert_eq!(body["data"]["results"][2]["count"], 1);
    assert_eq!(body["data"]["results"][0]["count"], 0);
}

#[tokio::test]
async fn test_guest_must_rsvp_before_answering() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Picnic").await;
    let other_event = app.create_event(ORGANIZER, "Other").await;
    app.bulk_add(ORGANIZER, &[&other_event], "Stranger, stranger@x.com").await;

    let poll = create_poll(&app, &event_id, json!(["Yes", "No"])).await;
    let poll_id = poll["data"]["id"].as_str().unwrap().to_string();

    let body = answer(&app, &poll_id, json!({"email": "stranger@x.com", "option": "Yes"})).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please RSVP to this event before answering polls");

    let body = answer(&app, &poll_id, json!({"option": "Yes"})).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_option_is_rejected() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Picnic").await;
    app.bulk_add(ORGANIZER, &[&event_id], "A, a@x.com").await;

    let poll = create_poll(&app, &event_id, json!(["Yes", "No"])).await;
    let poll_id = poll["data"]["id"].as_str().unwrap().to_string();

    assert_eq!(answer(&app, &poll_id, json!({"email": "a@x.com", "option": 5})).await["success"], false);
    assert_eq!(answer(&app, &poll_id, json!({"email": "a@x.com", "option": "Perhaps"})).await["success"], false);
}

#[tokio::test]
async fn test_poll_needs_two_distinct_options() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Picnic").await;

    let body = create_poll(&app, &event_id, json!(["Yes", " "])).await;
    assert_eq!(body["success"], false);

    let body = create_poll(&app, &event_id, json!(["Yes", "yes"])).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_polls_are_scoped_to_owner() {
    let app = TestApp::new().await;
    let event_id = app.create_event(ORGANIZER, "Picnic").await;
    create_poll(&app, &event_id, json!(["Yes", "No"])).await;

    let uri = format!("/api/v1/events/{}/polls", event_id);
    let own = parse_body(app.request("GET", &uri, Some(ORGANIZER), None).await).await;
    assert_eq!(own["data"].as_array().unwrap().len(), 1);
    assert_eq!(own["data"][0]["options"], json!(["Yes", "No"]));

    let foreign = app.request("GET", &uri, Some("org-mallory"), None).await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    let missing = app.request("GET", "/api/v1/polls/nope/results", None, None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
