use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub mail_from: String,
    pub admin_api_token: Option<String>,
    pub public_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| "Events <no-reply@events.local>".to_string()),
            admin_api_token: env::var("ADMIN_API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
