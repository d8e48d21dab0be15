use crate::domain::{models::event::{Event, EventFilter}, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn select(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, organizer_id, title, starts_at, location, capacity, created_at FROM events WHERE 1 = 1",
        );
        if let Some(id) = &filter.id {
            qb.push(" AND id = ").push_bind(id.clone());
        }
        if let Some(ids) = &filter.ids {
            if ids.is_empty() {
                qb.push(" AND 1 = 0");
            } else {
                qb.push(" AND id IN (");
                let mut list = qb.separated(", ");
                for id in ids {
                    list.push_bind(id.clone());
                }
                list.push_unseparated(")");
            }
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
            "INSERT INTO events (id, organizer_id, title, starts_at, location, capacity, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, organizer_id, title, starts_at, location, capacity, created_at",
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
