use crate::domain::{
    models::poll::{Poll, PollFilter, PollResponse, ResponseFilter},
    ports::PollRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Postgres, PgPool};

pub struct PostgresPollRepo {
    pool: PgPool,
}

impl PostgresPollRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_response_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ResponseFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(poll_id) = &filter.poll_id {
        qb.push(" AND poll_id = ").push_bind(poll_id.clone());
    }
    if let Some(guest_id) = &filter.guest_id {
        qb.push(" AND guest_id = ").push_bind(guest_id.clone());
    }
}

#[async_trait]
impl PollRepository for PostgresPollRepo {
    async fn select_polls(&self, filter: &PollFilter) -> Result<Vec<Poll>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id, event_id, question, options, created_at FROM polls WHERE 1 = 1");
        if let Some(id) = &filter.id {
            qb.push(" AND id = ").push_bind(id.clone());
        }
        if let Some(event_id) = &filter.event_id {
            qb.push(" AND event_id = ").push_bind(event_id.clone());
        }
        qb.push(" ORDER BY created_at ASC");

        qb.build_query_as::<Poll>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn insert_poll(&self, poll: &Poll) -> Result<Poll, AppError> {
        sqlx::query_as::<_, Poll>(
            "INSERT INTO polls (id, event_id, question, options, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING id, event_id, question, options, created_at",
        )
            .bind(&poll.id)
            .bind(&poll.event_id)
            .bind(&poll.question)
            .bind(&poll.options)
            .bind(poll.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn select_responses(&self, filter: &ResponseFilter) -> Result<Vec<PollResponse>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, poll_id, guest_id, selected_option, created_at, updated_at FROM poll_responses",
        );
        push_response_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at ASC");

        qb.build_query_as::<PollResponse>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn insert_response(&self, response: &PollResponse) -> Result<PollResponse, AppError> {
        sqlx::query_as::<_, PollResponse>(
            "INSERT INTO poll_responses (id, poll_id, guest_id, selected_option, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, poll_id, guest_id, selected_option, created_at, updated_at",
        )
            .bind(&response.id)
            .bind(&response.poll_id)
            .bind(&response.guest_id)
            .bind(&response.selected_option)
            .bind(response.created_at)
            .bind(response.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_response(&self, filter: &ResponseFilter, selected_option: &str) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE poll_responses SET selected_option = ");
        qb.push_bind(selected_option.to_string())
            .push(", updated_at = ")
            .push_bind(Utc::now());
        push_response_filter(&mut qb, filter);

        let result = qb.build()
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
