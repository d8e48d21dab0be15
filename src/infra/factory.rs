use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::services::dispatch::LAYOUT_TEMPLATE;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::email::http_mail_transport::HttpMailTransport;
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_guest_repo::PostgresGuestRepo,
    postgres_communication_repo::PostgresCommunicationRepo, postgres_poll_repo::PostgresPollRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_guest_repo::SqliteGuestRepo,
    sqlite_communication_repo::SqliteCommunicationRepo, sqlite_poll_repo::SqlitePollRepo,
};

/// Email layout shared by every outgoing message.
pub fn build_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(LAYOUT_TEMPLATE, include_str!("../templates/email_layout.html"))?;
    Ok(tera)
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;
    let mail_transport = Arc::new(HttpMailTransport::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let templates = Arc::new(build_templates()?);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse()?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;

        Ok(AppState {
            config: config.clone(),
            event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
            guest_repo: Arc::new(PostgresGuestRepo::new(pool.clone())),
            communication_repo: Arc::new(PostgresCommunicationRepo::new(pool.clone())),
            poll_repo: Arc::new(PostgresPollRepo::new(pool)),
            mail_transport,
            templates,
        })
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;

        Ok(AppState {
            config: config.clone(),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            guest_repo: Arc::new(SqliteGuestRepo::new(pool.clone())),
            communication_repo: Arc::new(SqliteCommunicationRepo::new(pool.clone())),
            poll_repo: Arc::new(SqlitePollRepo::new(pool)),
            mail_transport,
            templates,
        })
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
