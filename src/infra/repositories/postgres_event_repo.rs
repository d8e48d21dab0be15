use crate::domain::{models::event::{Event, EventFilter}, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Postgres, PgPool};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn select(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, organizer_id, title, starts_at, location, capacity, created_at FROM events WHERE 1 = 1",
        );
        if let Some(id) = &filter.id {
            qb.push(" AND id = ").push_bind(id.clone());
        }
        if let Some(ids) = &filter.ids {
            qb.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }
        if let Some(organizer_id) = &filter.organizer_id {
            qb.push(" AND organizer_id = ").push_bind(organizer_id.clone());
        }
        qb.push(" ORDER BY starts_at ASC");

        qb.build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn insert(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, organizer_id, title, starts_at, location, capacity, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id, organizer_id, title, starts_at, location, capacity, created_at",
        )
            .bind(&event.id)
            .bind(&event.organizer_id)
            .bind(&event.title)
            .bind(event.starts_at)
            .bind(&event.location)
            .bind(event.capacity)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
