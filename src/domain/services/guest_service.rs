use std::sync::Arc;
use crate::domain::{
    models::{
        event::{Event, EventFilter},
        guest::{Guest, GuestDraft, GuestFilter, GuestPatch, GuestStatus},
    },
    ports::{EventRepository, GuestRepository},
    services::{
        fallback::fetch_with_fallback,
        guest_import::{validate_guest, Cell},
    },
};
use crate::error::AppError;
use futures::FutureExt;
use tracing::info;

pub struct RsvpInput {
    pub name: String,
    pub email: String,
    pub status: GuestStatus,
    pub message: Option<String>,
}

#[derive(Default)]
pub struct GuestChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<GuestStatus>,
    pub message: Option<String>,
}

pub struct GuestService {
    events: Arc<dyn EventRepository>,
    guests: Arc<dyn GuestRepository>,
}

impl GuestService {
    pub fn new(events: Arc<dyn EventRepository>, guests: Arc<dyn GuestRepository>) -> Self {
        Self { events, guests }
    }

    pub async fn owned_event(&self, organizer_id: &str, event_id: &str) -> Result<Event, AppError> {
        self.events.find_owned(organizer_id, event_id).await?
            .ok_or_else(|| AppError::not_found("Event"))
    }

    pub async fn list_for_event(&self, organizer_id: &str, event_id: &str, status: Option<GuestStatus>) -> Result<Vec<Guest>, AppError> {
        let event = self.owned_event(organizer_id, event_id).await?;
        self.guests.select(&GuestFilter::by_event(&event.id).with_status(status)).await
    }

    /// Every guest across the organizer's events. Falls back to listing the
    /// events first when the joined query is unavailable.
    pub async fn list_for_organizer(&self, organizer_id: &str) -> Result<Vec<Guest>, AppError> {
        let joined = self.guests.select_for_organizer(organizer_id).boxed();
        let flat = async {
            let events = self.events.select(&EventFilter::by_organizer(organizer_id)).await?;
            let filter = GuestFilter {
                event_ids: Some(events.into_iter().map(|e| e.id).collect()),
                ..Default::default()
            };
            self.guests.select(&filter).await
        }.boxed();

        fetch_with_fallback(("joined", joined), vec![("per_event", flat)]).await
    }

    pub async fn add_guest(&self, organizer_id: &str, event_id: &str, draft: GuestDraft) -> Result<Guest, AppError> {
        let event = self.owned_event(organizer_id, event_id).await?;
        self.ensure_email_free(&event.id, &draft.email, None).await?;

        let guest = Guest::new(event.id.clone(), draft);
        let created = self.guests.insert(std::slice::from_ref(&guest)).await?
            .pop()
            .ok_or(AppError::Internal)?;

        info!("Added guest {} to event {}", created.id, event.id);
        Ok(created)
    }

    /// Self-service answer from an invitee. Creates the guest when the email is
    /// not on the list yet, otherwise updates the existing row.
    pub async fn rsvp(&self, event_id: &str, input: RsvpInput) -> Result<Guest, AppError> {
        let event = self.events.find_by_id(event_id).await?
            .ok_or_else(|| AppError::not_found("Event"))?;

        if input.status == GuestStatus::Pending {
            return Err(AppError::Validation("Please choose whether you will attend".into()));
        }
        let draft = validate_guest(
            Cell::Text(&input.name),
            Cell::Text(&input.email),
            Cell::Text(input.status.as_str()),
            input.message.as_deref().map_or(Cell::Missing, Cell::Text),
        ).map_err(AppError::Validation)?;

        let existing = self.guests.select(&GuestFilter::by_event_and_email(&event.id, &draft.email)).await?.pop();
        match existing {
            Some(guest) => {
                let patch = GuestPatch {
                    name: Some(draft.name),
                    message: Some(draft.message),
                    ..Default::default()
                }.with_status(draft.status);
                self.guests.update(&GuestFilter::by_id(&guest.id), &patch).await?;
                info!("Guest {} updated RSVP for event {} to {}", guest.id, event.id, draft.status);
                self.reload(&guest.id).await
            }
            None => {
                let guest = Guest::new(event.id.clone(), draft);
                let created = self.guests.insert(std::slice::from_ref(&guest)).await?
                    .pop()
                    .ok_or(AppError::Internal)?;
                info!("New guest {} RSVPed to event {}", created.id, event.id);
                Ok(created)
            }
        }
    }

    pub async fn update_guest(&self, organizer_id: &str, guest_id: &str, changes: GuestChanges) -> Result<Guest, AppError> {
        let guest = self.owned_guest(organizer_id, guest_id).await?;

        // Re-run row validation against the merged values.
        let merged = validate_guest(
            Cell::Text(changes.name.as_deref().unwrap_or(&guest.name)),
            Cell::Text(changes.email.as_deref().unwrap_or(&guest.email)),
            Cell::Text(changes.status.unwrap_or(guest.status).as_str()),
            Cell::Missing,
        ).map_err(AppError::Validation)?;

        if merged.email_key() != guest.email_key() {
            self.ensure_email_free(&guest.event_id, &merged.email, Some(&guest.id)).await?;
        }

        let mut patch = GuestPatch {
            name: changes.name.map(|_| merged.name),
            email: changes.email.map(|_| merged.email),
            message: changes.message.map(|m| Some(m.trim().to_string()).filter(|m| !m.is_empty())),
            ..Default::default()
        };
        if let Some(status) = changes.status
            && status != guest.status
        {
            patch = patch.with_status(status);
        }

        self.guests.update(&GuestFilter::by_id(&guest.id), &patch).await?;
        info!("Updated guest {}", guest.id);
        self.reload(&guest.id).await
    }

    pub async fn delete_guest(&self, organizer_id: &str, guest_id: &str) -> Result<(), AppError> {
        let guest = self.owned_guest(organizer_id, guest_id).await?;
        let removed = self.guests.delete(&GuestFilter::by_id(&guest.id)).await?;
        if removed == 0 {
            return Err(AppError::not_found("Guest"));
        }
        info!("Deleted guest {}", guest.id);
        Ok(())
    }

    async fn owned_guest(&self, organizer_id: &str, guest_id: &str) -> Result<Guest, AppError> {
        let guest = self.guests.select(&GuestFilter::by_id(guest_id)).await?
            .pop()
            .ok_or_else(|| AppError::not_found("Guest"))?;

        match self.events.find_owned(organizer_id, &guest.event_id).await? {
            Some(_) => Ok(guest),
            None => Err(AppError::not_found("Guest")),
        }
    }

    async fn ensure_email_free(&self, event_id: &str, email: &str, except_guest: Option<&str>) -> Result<(), AppError> {
        let taken = self.guests.select(&GuestFilter::by_event_and_email(event_id, email)).await?
            .into_iter()
            .any(|g| Some(g.id.as_str()) != except_guest);
        if taken {
            return Err(AppError::Conflict("A guest with this email is already on the list".into()));
        }
        Ok(())
    }

    async fn reload(&self, guest_id: &str) -> Result<Guest, AppError> {
        self.guests.select(&GuestFilter::by_id(guest_id)).await?
            .pop()
            .ok_or_else(|| AppError::not_found("Guest"))
    }
}
