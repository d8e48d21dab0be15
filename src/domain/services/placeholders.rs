use crate::domain::models::{communication::MessageKind, event::Event, guest::Guest};
use serde::Serialize;

pub const NAME: &str = "{name}";
pub const EVENT_TITLE: &str = "{event_title}";
pub const EVENT_DATE: &str = "{event_date}";
pub const EVENT_LOCATION: &str = "{event_location}";

#[derive(Debug, Serialize, Clone)]
pub struct Placeholder {
    pub key: &'static str,
    pub description: &'static str,
    pub sample_value: &'static str,
}

/// Values for one recipient of one event.
pub struct PlaceholderValues<'a> {
    pub name: &'a str,
    pub event_title: &'a str,
    pub event_date: String,
    pub event_location: &'a str,
}

impl<'a> PlaceholderValues<'a> {
    pub fn for_guest(event: &'a Event, guest: &'a Guest) -> Self {
        Self {
            name: &guest.name,
            event_title: &event.title,
            event_date: event.display_date(),
            event_location: &event.location,
        }
    }
}

pub fn placeholders_for(kind: MessageKind) -> Vec<Placeholder> {
    let mut list = vec![
        Placeholder { key: NAME, description: "Guest name", sample_value: "Jane Doe" },
    ];
    if kind == MessageKind::Announcement {
        list.extend([
            Placeholder { key: EVENT_TITLE, description: "Event title", sample_value: "Summer Party" },
            Placeholder { key: EVENT_DATE, description: "Event date and time", sample_value: "Saturday, July 6, 2024 at 18:00 UTC" },
            Placeholder { key: EVENT_LOCATION, description: "Event location", sample_value: "Rooftop Bar" },
        ]);
    }
    list
}

/// Plain replace-all over the whitelist for `kind`. Unknown braces are left
/// untouched and substituted values are not re-escaped.
pub fn substitute(text: &str, kind: MessageKind, values: &PlaceholderValues<'_>) -> String {
    let mut out = text.replace(NAME, values.name);
    if kind == MessageKind::Announcement {
        out = out
            .replace(EVENT_TITLE, values.event_title)
            .replace(EVENT_DATE, &values.event_date)
            .replace(EVENT_LOCATION, values.event_location);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> PlaceholderValues<'static> {
        PlaceholderValues {
            name: "Ada",
            event_title: "Launch",
            event_date: "Monday".to_string(),
            event_location: "Hall 1",
        }
    }

    #[test]
    fn test_name_replaced_everywhere() {
        let out = substitute("Hi {name}! Bye {name}.", MessageKind::Reminder, &values());
        assert_eq!(out, "Hi Ada! Bye Ada.");
    }

    #[test]
    fn test_event_fields_only_for_announcements() {
        let text = "{name}: {event_title} on {event_date} at {event_location} {unknown}";
        assert_eq!(
            substitute(text, MessageKind::Custom, &values()),
            "Ada: {event_title} on {event_date} at {event_location} {unknown}"
        );
        assert_eq!(
            substitute(text, MessageKind::Announcement, &values()),
            "Ada: Launch on Monday at Hall 1 {unknown}"
        );
    }

    #[test]
    fn test_placeholder_listing() {
        assert_eq!(placeholders_for(MessageKind::Invitation).len(), 1);
        assert_eq!(placeholders_for(MessageKind::Announcement).len(), 4);
    }
}
