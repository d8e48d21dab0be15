use guestlist_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::factory::build_templates,
    infra::repositories::{
        sqlite_event_repo::SqliteEventRepo,
        sqlite_guest_repo::SqliteGuestRepo,
        sqlite_communication_repo::SqliteCommunicationRepo,
        sqlite_poll_repo::SqlitePollRepo,
    },
    domain::models::communication::OutgoingMail,
    domain::ports::MailTransport,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_TOKEN: &str = "admin-test-token";

/// Records every message and fails delivery for the addresses in `failing`.
#[derive(Default)]
pub struct MockMailTransport {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub failing: Mutex<HashSet<String>>,
}

#[allow(dead_code)]
impl MockMailTransport {
    pub fn fail_for(&self, email: &str) {
        self.failing.lock().unwrap().insert(email.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError> {
        if self.failing.lock().unwrap().contains(&mail.to) {
            return Err(AppError::Transport(format!("mailbox {} unavailable", mail.to)));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub mail: Arc<MockMailTransport>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            mail_from: "Events <no-reply@events.test>".to_string(),
            admin_api_token: Some(ADMIN_TOKEN.to_string()),
            public_base_url: "http://localhost:3000".to_string(),
        };

        let mail = Arc::new(MockMailTransport::default());

        let state = Arc::new(AppState {
            config,
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            guest_repo: Arc::new(SqliteGuestRepo::new(pool.clone())),
            communication_repo: Arc::new(SqliteCommunicationRepo::new(pool.clone())),
            poll_repo: Arc::new(SqlitePollRepo::new(pool.clone())),
            mail_transport: mail.clone(),
            templates: Arc::new(build_templates().expect("email layout compiles")),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            mail,
        }
    }

    /// Sends a request as `organizer` (no organizer header when `None`).
    pub async fn request(&self, method: &str, uri: &str, organizer: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(organizer) = organizer {
            builder = builder.header("X-Organizer-Id", organizer);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn create_event(&self, organizer: &str, title: &str) -> String {
        let payload = json!({
            "title": title,
            "starts_at": "2030-06-01T18:00:00Z",
            "location": "Town Hall",
            "capacity": 50
        });
        let response = self.request("POST", "/api/v1/events", Some(organizer), Some(payload)).await;
        assert!(response.status().is_success(), "event creation failed: {}", response.status());

        let body = parse_body(response).await;
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn bulk_add(&self, organizer: &str, event_ids: &[&str], input: &str) -> Value {
        let payload = json!({ "event_ids": event_ids, "input": input });
        let response = self.request("POST", "/api/v1/guests/bulk", Some(organizer), Some(payload)).await;
        parse_body(response).await
    }

    pub async fn guests(&self, organizer: &str, event_id: &str) -> Vec<Value> {
        let uri = format!("/api/v1/events/{}/guests", event_id);
        let body = parse_body(self.request("GET", &uri, Some(organizer), None).await).await;
        body["data"].as_array().cloned().unwrap_or_default()
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
