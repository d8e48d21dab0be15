use crate::domain::{
    models::guest::{Guest, GuestFilter, GuestPatch},
    ports::GuestRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Postgres, PgPool};

const GUEST_COLUMNS: &str = "id, event_id, name, email, status, message, responded_at, created_at, updated_at";

pub struct PostgresGuestRepo {
    pool: PgPool,
}

impl PostgresGuestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_any(qb: &mut QueryBuilder<'_, Postgres>, column: &str, values: &[String]) {
    qb.push(format!(" AND {} = ANY(", column))
        .push_bind(values.to_vec())
        .push(")");
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &GuestFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(id) = &filter.id {
        qb.push(" AND id = ").push_bind(id.clone());
    }
    if let Some(ids) = &filter.ids {
        push_any(qb, "id", ids);
    }
    if let Some(event_id) = &filter.event_id {
        qb.push(" AND event_id = ").push_bind(event_id.clone());
    }
    if let Some(event_ids) = &filter.event_ids {
        push_any(qb, "event_id", event_ids);
    }
    if let Some(emails) = &filter.emails {
        let lowered: Vec<String> = emails.iter().map(|e| e.trim().to_lowercase()).collect();
        push_any(qb, "LOWER(email)", &lowered);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl GuestRepository for PostgresGuestRepo {
    async fn select(&self, filter: &GuestFilter) -> Result<Vec<Guest>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM guests", GUEST_COLUMNS));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at ASC, name ASC");

        qb.build_query_as::<Guest>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn select_for_organizer(&self, organizer_id: &str) -> Result<Vec<Guest>, AppError> {
        sqlx::query_as::<_, Guest>(
            "SELECT g.id, g.event_id, g.name, g.email, g.status, g.message, g.responded_at, g.created_at, g.updated_at
             FROM guests g
             JOIN events e ON e.id = g.event_id
             WHERE e.organizer_id = $1
             ORDER BY e.starts_at ASC, g.created_at ASC",
        )
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn insert(&self, guests: &[Guest]) -> Result<Vec<Guest>, AppError> {
        if guests.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO guests ({}) ", GUEST_COLUMNS));
        qb.push_values(guests, |mut row, g| {
            row.push_bind(g.id.clone())
                .push_bind(g.event_id.clone())
                .push_bind(g.name.clone())
                .push_bind(g.email.clone())
                .push_bind(g.status.as_str())
                .push_bind(g.message.clone())
                .push_bind(g.responded_at)
                .push_bind(g.created_at)
                .push_bind(g.updated_at);
        });
        qb.push(format!(" RETURNING {}", GUEST_COLUMNS));

        qb.build_query_as::<Guest>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, filter: &GuestFilter, patch: &GuestPatch) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE guests SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name.clone());
        }
        if let Some(email) = &patch.email {
            qb.push(", email = ").push_bind(email.clone());
        }
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(message) = &patch.message {
            qb.push(", message = ").push_bind(message.clone());
        }
        if let Some(responded_at) = patch.responded_at {
            qb.push(", responded_at = ").push_bind(responded_at);
        }
        push_filter(&mut qb, filter);

        let result = qb.build()
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, filter: &GuestFilter) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM guests");
        push_filter(&mut qb, filter);

        let result = qb.build()
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
