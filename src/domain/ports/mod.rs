use crate::domain::models::{
    event::{Event, EventFilter},
    guest::{Guest, GuestFilter, GuestPatch},
    communication::{EmailTemplate, TemplateFilter, TemplatePatch, CommunicationRecord, RecordFilter, OutgoingMail},
    poll::{Poll, PollFilter, PollResponse, ResponseFilter},
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn select(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError>;
    async fn insert(&self, event: &Event) -> Result<Event, AppError>;

    async fn find_owned(&self, organizer_id: &str, event_id: &str) -> Result<Option<Event>, AppError> {
        let mut events = self.select(&EventFilter::owned(organizer_id, event_id)).await?;
        Ok(events.pop())
    }

    async fn find_by_id(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        let filter = EventFilter { id: Some(event_id.to_string()), ..Default::default() };
        let mut events = self.select(&filter).await?;
        Ok(events.pop())
    }
}

#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn select(&self, filter: &GuestFilter) -> Result<Vec<Guest>, AppError>;
    /// Guests of every event owned by the organizer, resolved with a join.
    async fn select_for_organizer(&self, organizer_id: &str) -> Result<Vec<Guest>, AppError>;
    /// Inserts all rows in a single statement.
    async fn insert(&self, guests: &[Guest]) -> Result<Vec<Guest>, AppError>;
    async fn update(&self, filter: &GuestFilter, patch: &GuestPatch) -> Result<u64, AppError>;
    async fn delete(&self, filter: &GuestFilter) -> Result<u64, AppError>;
}

#[async_trait]
pub trait CommunicationRepository: Send + Sync {
    async fn select_templates(&self, filter: &TemplateFilter) -> Result<Vec<EmailTemplate>, AppError>;
    async fn insert_template(&self, template: &EmailTemplate) -> Result<EmailTemplate, AppError>;
    async fn update_template(&self, id: &str, patch: &TemplatePatch) -> Result<EmailTemplate, AppError>;
    async fn delete_template(&self, filter: &TemplateFilter) -> Result<u64, AppError>;

    async fn insert_record(&self, record: &CommunicationRecord) -> Result<CommunicationRecord, AppError>;
    async fn select_records(&self, filter: &RecordFilter) -> Result<Vec<CommunicationRecord>, AppError>;
}

#[async_trait]
pub trait PollRepository: Send + Sync {
    async fn select_polls(&self, filter: &PollFilter) -> Result<Vec<Poll>, AppError>;
    async fn insert_poll(&self, poll: &Poll) -> Result<Poll, AppError>;

    async fn select_responses(&self, filter: &ResponseFilter) -> Result<Vec<PollResponse>, AppError>;
    async fn insert_response(&self, response: &PollResponse) -> Result<PollResponse, AppError>;
    async fn update_response(&self, filter: &ResponseFilter, selected_option: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError>;
}
