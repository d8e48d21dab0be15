use std::sync::Arc;
use crate::domain::{
    models::{
        communication::{CommunicationRecord, DeliveryResult, EmailTemplate, MessageKind, OutgoingMail},
        event::Event,
        guest::Guest,
    },
    ports::{CommunicationRepository, MailTransport},
    services::{
        defaults::{default_body, default_subject},
        placeholders::{substitute, PlaceholderValues},
    },
};
use crate::error::AppError;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::{error, info, info_span, warn, Instrument};

pub const LAYOUT_TEMPLATE: &str = "email_layout.html";

#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub kind: MessageKind,
    pub subject: String,
    pub body: String,
}

impl MessageDraft {
    /// Picks subject and body independently: explicit text first, then the
    /// stored template, then the built-in default for the kind. Explicit
    /// blank text is kept so `dispatch` can reject it.
    pub fn resolve(kind: MessageKind, template: Option<&EmailTemplate>, subject: Option<&str>, body: Option<&str>) -> Self {
        let explicit = |text: Option<&str>| text.map(|t| t.trim().to_string());

        let subject = explicit(subject)
            .or_else(|| template.map(|t| t.subject.clone()))
            .unwrap_or_else(|| default_subject(kind).to_string());
        let body = explicit(body)
            .or_else(|| template.map(|t| t.body.clone()))
            .unwrap_or_else(|| default_body(kind).to_string());

        Self { kind, subject, body }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct DispatchReport {
    pub results: Vec<DeliveryResult>,
    pub recipient_count: usize,
    pub success_count: usize,
    /// `None` when the history entry could not be written.
    pub record: Option<CommunicationRecord>,
}

impl DispatchReport {
    pub fn summary(&self) -> String {
        let failed = self.recipient_count - self.success_count;
        if failed == 0 {
            format!("Sent to {} recipient(s)", self.success_count)
        } else {
            format!("Sent to {} of {} recipient(s); {} failed", self.success_count, self.recipient_count, failed)
        }
    }
}

/// Sends one message to a resolved recipient list, one recipient at a time.
/// Each recipient is isolated: a transport failure is recorded and the loop
/// moves on. No retries.
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    records: Arc<dyn CommunicationRepository>,
    layout: Arc<Tera>,
    from: String,
    public_base_url: String,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        records: Arc<dyn CommunicationRepository>,
        layout: Arc<Tera>,
        from: String,
        public_base_url: String,
    ) -> Self {
        Self { transport, records, layout, from, public_base_url }
    }

    pub async fn dispatch(&self, event: &Event, recipients: &[Guest], draft: &MessageDraft) -> Result<DispatchReport, AppError> {
        if recipients.is_empty() {
            return Err(AppError::Validation("No recipients match the selected audience".into()));
        }
        if draft.subject.trim().is_empty() {
            return Err(AppError::Validation("Subject must not be empty".into()));
        }
        if draft.body.trim().is_empty() {
            return Err(AppError::Validation("Message body must not be empty".into()));
        }

        let span = info_span!("dispatch", event_id = %event.id, kind = %draft.kind, recipients = recipients.len());
        async move {
            let mut results = Vec::with_capacity(recipients.len());
            for guest in recipients {
                let outcome = self.deliver(event, guest, draft).await;
                match outcome {
                    Ok(()) => results.push(DeliveryResult::sent(&guest.email)),
                    Err(e) => {
                        warn!(recipient = %guest.email, "Delivery failed: {}", e);
                        results.push(DeliveryResult::failed(&guest.email, e.to_string()));
                    }
                }
            }

            let success_count = results.iter().filter(|r| r.success).count();
            info!(success_count, "Dispatch finished");

            let record = CommunicationRecord::new(
                event.id.clone(),
                draft.kind,
                draft.subject.clone(),
                recipients.len(),
                success_count,
            );
            let record = match self.records.insert_record(&record).await {
                Ok(saved) => Some(saved),
                Err(e) => {
                    error!("Failed to record communication: {}", e);
                    None
                }
            };

            Ok(DispatchReport {
                results,
                recipient_count: recipients.len(),
                success_count,
                record,
            })
        }
            .instrument(span)
            .await
    }

    async fn deliver(&self, event: &Event, guest: &Guest, draft: &MessageDraft) -> Result<(), AppError> {
        let values = PlaceholderValues::for_guest(event, guest);
        let body = substitute(&draft.body, draft.kind, &values);
        let html = self.render_layout(event, &draft.subject, &body)?;

        let mail = OutgoingMail {
            from: self.from.clone(),
            to: guest.email.clone(),
            subject: draft.subject.clone(),
            html,
        };
        self.transport.send(&mail).await
    }

    fn render_layout(&self, event: &Event, subject: &str, body: &str) -> Result<String, AppError> {
        let mut context = Context::new();
        context.insert("subject", subject);
        context.insert("body", body);
        context.insert("event_title", &event.title);
        context.insert("event_date", &event.display_date());
        context.insert("event_location", &event.location);
        context.insert("rsvp_url", &format!("{}/events/{}/rsvp", self.public_base_url.trim_end_matches('/'), event.id));
        Ok(self.layout.render(LAYOUT_TEMPLATE, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> EmailTemplate {
        EmailTemplate::new(
            "org-1".into(),
            None,
            "Welcome".into(),
            "Stored subject".into(),
            "Stored body for {name}".into(),
            MessageKind::Invitation,
        )
    }

    #[test]
    fn test_explicit_text_wins_over_template() {
        let t = template();
        let draft = MessageDraft::resolve(MessageKind::Invitation, Some(&t), Some("Custom subject"), None);
        assert_eq!(draft.subject, "Custom subject");
        assert_eq!(draft.body, "Stored body for {name}");
    }

    #[test]
    fn test_blank_text_is_kept_and_missing_text_falls_back() {
        let draft = MessageDraft::resolve(MessageKind::Reminder, None, Some("   "), None);
        assert!(draft.subject.is_empty());
        assert_eq!(draft.body, default_body(MessageKind::Reminder));

        let draft = MessageDraft::resolve(MessageKind::Reminder, None, None, Some(""));
        assert_eq!(draft.subject, default_subject(MessageKind::Reminder));
        assert!(draft.body.is_empty());
    }

    #[test]
    fn test_summary_reports_failures() {
        let report = DispatchReport {
            results: vec![
                DeliveryResult::sent("a@x.com"),
                DeliveryResult::failed("b@x.com", "boom".into()),
            ],
            recipient_count: 2,
            success_count: 1,
            record: None,
        };
        assert_eq!(report.summary(), "Sent to 1 of 2 recipient(s); 1 failed");
    }
}
