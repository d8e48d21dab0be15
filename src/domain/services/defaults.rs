use crate::domain::models::communication::MessageKind;

pub fn default_body(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Invitation => include_str!("../../templates/defaults/invitation.txt"),
        MessageKind::Reminder => include_str!("../../templates/defaults/reminder.txt"),
        MessageKind::Update => include_str!("../../templates/defaults/update.txt"),
        MessageKind::Announcement => include_str!("../../templates/defaults/announcement.txt"),
        MessageKind::Custom => "Hi {name},\n\n",
    }
}

pub fn default_subject(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Invitation => DEFAULT_INVITATION_SUBJECT,
        MessageKind::Reminder => DEFAULT_REMINDER_SUBJECT,
        MessageKind::Update => DEFAULT_UPDATE_SUBJECT,
        MessageKind::Announcement => DEFAULT_ANNOUNCEMENT_SUBJECT,
        MessageKind::Custom => DEFAULT_CUSTOM_SUBJECT,
    }
}

pub const DEFAULT_INVITATION_SUBJECT: &str = "You're invited!";
pub const DEFAULT_REMINDER_SUBJECT: &str = "Reminder: please let us know if you can make it";
pub const DEFAULT_UPDATE_SUBJECT: &str = "An update about the event";
pub const DEFAULT_ANNOUNCEMENT_SUBJECT: &str = "Announcement";
pub const DEFAULT_CUSTOM_SUBJECT: &str = "A message from the organizer";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_exist() {
        let invite = default_body(MessageKind::Invitation);
        assert!(invite.contains("You are invited"), "Invitation content mismatch");
        assert!(invite.contains("{name}"));

        let reminder = default_body(MessageKind::Reminder);
        assert!(reminder.contains("friendly reminder"), "Reminder content mismatch");

        let update = default_body(MessageKind::Update);
        assert!(update.contains("update"), "Update content mismatch");

        let announcement = default_body(MessageKind::Announcement);
        assert!(announcement.contains("{event_title}"));
        assert!(announcement.contains("{event_location}"));

        assert!(!default_subject(MessageKind::Custom).is_empty());
    }
}
