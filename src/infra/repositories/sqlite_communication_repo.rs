use crate::domain::models::communication::{
    CommunicationRecord, EmailTemplate, RecordFilter, TemplateFilter, TemplatePatch,
};
use crate::domain::ports::CommunicationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const TEMPLATE_COLUMNS: &str = "id, organizer_id, event_id, name, subject, body, kind, created_at, updated_at";
const RECORD_COLUMNS: &str = "id, event_id, kind, subject, recipient_count, success_count, sent_at";

pub struct SqliteCommunicationRepo {
    pool: SqlitePool,
}

impl SqliteCommunicationRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

fn push_template_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &TemplateFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(id) = &filter.id {
        qb.push(" AND id = ").push_bind(id.clone());
    }
    if let Some(organizer_id) = &filter.organizer_id {
        qb.push(" AND organizer_id = ").push_bind(organizer_id.clone());
    }
    if let Some(event_id) = &filter.visible_for_event {
        qb.push(" AND (event_id IS NULL OR event_id = ").push_bind(event_id.clone()).push(")");
    }
}

#[async_trait]
impl CommunicationRepository for SqliteCommunicationRepo {
    async fn select_templates(&self, filter: &TemplateFilter) -> Result<Vec<EmailTemplate>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM email_templates", TEMPLATE_COLUMNS));
        push_template_filter(&mut qb, filter);
        qb.push(" ORDER BY name ASC");

        qb.build_query_as::<EmailTemplate>()
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn insert_template(&self, t: &EmailTemplate) -> Result<EmailTemplate, AppError> {
        sqlx::query_as::<_, EmailTemplate>(
            "INSERT INTO email_templates (id, organizer_id, event_id, name, subject, body, kind, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&t.id).bind(&t.organizer_id).bind(&t.event_id).bind(&t.name)
            .bind(&t.subject).bind(&t.body).bind(t.kind.as_str())
            .bind(t.created_at).bind(t.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_template(&self, id: &str, patch: &TemplatePatch) -> Result<EmailTemplate, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE email_templates SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name.clone());
        }
        if let Some(subject) = &patch.subject {
            qb.push(", subject = ").push_bind(subject.clone());
        }
        if let Some(body) = &patch.body {
            qb.push(", body = ").push_bind(body.clone());
        }
        if let Some(kind) = patch.kind {
            qb.push(", kind = ").push_bind(kind.as_str());
        }
        qb.push(" WHERE id = ").push_bind(id.to_string());
        qb.push(format!(" RETURNING {}", TEMPLATE_COLUMNS));

        qb.build_query_as::<EmailTemplate>()
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::not_found("Template"))
    }

    async fn delete_template(&self, filter: &TemplateFilter) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM email_templates");
        push_template_filter(&mut qb, filter);

        let res = qb.build().execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(res.rows_affected())
    }

    async fn insert_record(&self, r: &CommunicationRecord) -> Result<CommunicationRecord, AppError> {
        sqlx::query_as::<_, CommunicationRecord>(
            "INSERT INTO communications (id, event_id, kind, subject, recipient_count, success_count, sent_at)
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&r.id).bind(&r.event_id).bind(r.kind.as_str()).bind(&r.subject)
            .bind(r.recipient_count).bind(r.success_count).bind(r.sent_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn select_records(&self, filter: &RecordFilter) -> Result<Vec<CommunicationRecord>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM communications WHERE 1 = 1", RECORD_COLUMNS));
        if let Some(event_id) = &filter.event_id {
            qb.push(" AND event_id = ").push_bind(event_id.clone());
        }
        if let Some(event_ids) = &filter.event_ids {
            if event_ids.is_empty() {
                qb.push(" AND 1 = 0");
            } else {
                qb.push(" AND event_id IN (");
                let mut list = qb.separated(", ");
                for id in event_ids {
                    list.push_bind(id.clone());
                }
                list.push_unseparated(")");
            }
        }
        qb.push(" ORDER BY sent_at DESC");

        qb.build_query_as::<CommunicationRecord>()
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
