use std::collections::HashSet;
use std::sync::Arc;
use crate::domain::{
    models::guest::{Guest, GuestDraft, GuestFilter},
    ports::{EventRepository, GuestRepository},
};
use crate::error::AppError;
use serde::Serialize;
use tracing::{error, info, info_span, Instrument};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Clone)]
pub struct EventBatchResult {
    pub event_id: String,
    pub event_title: String,
    pub added: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl EventBatchResult {
    fn new(event_id: &str) -> Self {
        Self {
            event_id: event_id.to_string(),
            event_title: String::new(),
            added: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct BatchReport {
    pub results: Vec<EventBatchResult>,
    pub progress: BatchProgress,
}

impl BatchReport {
    pub fn total_added(&self) -> usize {
        self.results.iter().map(|r| r.added).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.results.iter().map(|r| r.skipped).sum()
    }

    pub fn failed_events(&self) -> usize {
        self.results.iter().filter(|r| !r.errors.is_empty()).count()
    }

    pub fn summary(&self) -> String {
        let mut msg = format!("Added {} guest(s), skipped {} duplicate(s)", self.total_added(), self.total_skipped());
        if self.failed_events() > 0 {
            msg.push_str(&format!("; {} event(s) reported errors", self.failed_events()));
        }
        msg
    }
}

/// Splits drafts into rows to insert and a count of duplicates. A draft is a
/// duplicate when its email is already on the event or appeared earlier in
/// the same input.
pub fn partition_new_guests<'a>(existing: &HashSet<String>, drafts: &'a [GuestDraft]) -> (Vec<&'a GuestDraft>, usize) {
    let mut seen = existing.clone();
    let mut fresh = Vec::new();
    let mut skipped = 0;

    for draft in drafts {
        if seen.insert(draft.email_key()) {
            fresh.push(draft);
        } else {
            skipped += 1;
        }
    }
    (fresh, skipped)
}

/// Writes one validated guest list into several events, one event at a time.
/// Not transactional: each event reports its own outcome and a failure on one
/// event never stops the others.
pub struct GuestBatchWriter {
    events: Arc<dyn EventRepository>,
    guests: Arc<dyn GuestRepository>,
}

impl GuestBatchWriter {
    pub fn new(events: Arc<dyn EventRepository>, guests: Arc<dyn GuestRepository>) -> Self {
        Self { events, guests }
    }

    pub async fn add_to_events<F>(
        &self,
        organizer_id: &str,
        event_ids: &[String],
        drafts: &[GuestDraft],
        mut on_progress: F,
    ) -> BatchReport
    where
        F: FnMut(BatchProgress) + Send,
    {
        let total = event_ids.len();
        let mut results = Vec::with_capacity(total);

        for (idx, event_id) in event_ids.iter().enumerate() {
            let span = info_span!("bulk_add_event", event_id = %event_id);
            let result = self.add_to_event(organizer_id, event_id, drafts)
                .instrument(span)
                .await;
            results.push(result);

            let progress = BatchProgress { processed: idx + 1, total };
            info!(processed = progress.processed, total = progress.total, "bulk add progress");
            on_progress(progress);
        }

        BatchReport {
            results,
            progress: BatchProgress { processed: total, total },
        }
    }

    async fn add_to_event(&self, organizer_id: &str, event_id: &str, drafts: &[GuestDraft]) -> EventBatchResult {
        let mut result = EventBatchResult::new(event_id);

        let event = match self.events.find_owned(organizer_id, event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                result.errors.push(AppError::not_found("Event").to_string());
                return result;
            }
            Err(e) => {
                error!("Failed to load event: {}", e);
                result.errors.push(format!("Could not load event: {}", e));
                return result;
            }
        };
        result.event_title = event.title.clone();

        let existing: HashSet<String> = match self.guests.select(&GuestFilter::by_event(&event.id)).await {
            Ok(guests) => guests.iter().map(Guest::email_key).collect(),
            Err(e) => {
                error!("Failed to fetch existing guests: {}", e);
                result.errors.push(format!("Could not check existing guests: {}", e));
                return result;
            }
        };

        let (fresh, skipped) = partition_new_guests(&existing, drafts);
        result.skipped = skipped;

        if fresh.is_empty() {
            info!(skipped, "No new guests to add");
            return result;
        }

        let rows: Vec<Guest> = fresh.into_iter()
            .map(|draft| Guest::new(event.id.clone(), draft.clone()))
            .collect();

        match self.guests.insert(&rows).await {
            Ok(inserted) => {
                result.added = inserted.len();
                info!(added = result.added, skipped, "Guests added to event");
            }
            Err(e) => {
                error!("Failed to insert guests: {}", e);
                result.errors.push(format!("Could not save guests: {}", e));
            }
        }
        result
    }
}
