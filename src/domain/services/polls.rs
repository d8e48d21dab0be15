use std::sync::Arc;
use crate::domain::{
    models::{
        event::Event,
        guest::{Guest, GuestFilter},
        poll::{OptionChoice, OptionTally, Poll, PollFilter, PollResponse, PollResults, ResponseFilter},
    },
    ports::{GuestRepository, PollRepository},
};
use crate::error::AppError;
use chrono::Utc;
use tracing::info;

pub const RSVP_FIRST: &str = "Please RSVP to this event before answering polls";

pub struct PollService {
    polls: Arc<dyn PollRepository>,
    guests: Arc<dyn GuestRepository>,
}

impl PollService {
    pub fn new(polls: Arc<dyn PollRepository>, guests: Arc<dyn GuestRepository>) -> Self {
        Self { polls, guests }
    }

    pub async fn create_poll(&self, event: &Event, question: &str, options: &[String]) -> Result<Poll, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Validation("Poll question must not be empty".into()));
        }

        let mut cleaned: Vec<String> = Vec::with_capacity(options.len());
        for option in options.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
            if cleaned.iter().any(|c| c.eq_ignore_ascii_case(option)) {
                return Err(AppError::Validation(format!("Duplicate poll option \"{}\"", option)));
            }
            cleaned.push(option.to_string());
        }
        if cleaned.len() < 2 {
            return Err(AppError::Validation("A poll needs at least two options".into()));
        }

        let poll = Poll::new(event.id.clone(), question.to_string(), cleaned);
        let created = self.polls.insert_poll(&poll).await?;
        info!("Created poll {} for event {}", created.id, event.id);
        Ok(created)
    }

    pub async fn list_polls(&self, event_id: &str) -> Result<Vec<Poll>, AppError> {
        self.polls.select_polls(&PollFilter { event_id: Some(event_id.to_string()), ..Default::default() }).await
    }

    pub async fn find_poll(&self, poll_id: &str) -> Result<Poll, AppError> {
        let filter = PollFilter { id: Some(poll_id.to_string()), ..Default::default() };
        self.polls.select_polls(&filter).await?
            .pop()
            .ok_or_else(|| AppError::NotFound("Poll not found".into()))
    }

    /// Records the guest's answer; a second answer replaces the first.
    pub async fn submit_response(&self, poll_id: &str, guest_id: &str, choice: &OptionChoice) -> Result<PollResponse, AppError> {
        let poll = self.find_poll(poll_id).await?;
        let filter = GuestFilter {
            id: Some(guest_id.to_string()),
            event_id: Some(poll.event_id.clone()),
            ..Default::default()
        };
        let guest = self.guests.select(&filter).await?
            .pop()
            .ok_or_else(|| AppError::Validation(RSVP_FIRST.into()))?;

        self.record_choice(&poll, &guest, choice).await
    }

    pub async fn submit_response_by_email(&self, poll_id: &str, email: &str, choice: &OptionChoice) -> Result<PollResponse, AppError> {
        let poll = self.find_poll(poll_id).await?;
        let guest = self.guests.select(&GuestFilter::by_event_and_email(&poll.event_id, email)).await?
            .pop()
            .ok_or_else(|| AppError::Validation(RSVP_FIRST.into()))?;

        self.record_choice(&poll, &guest, choice).await
    }

    async fn record_choice(&self, poll: &Poll, guest: &Guest, choice: &OptionChoice) -> Result<PollResponse, AppError> {
        let selected = resolve_choice(poll.options(), choice)?;
        let filter = ResponseFilter {
            poll_id: Some(poll.id.clone()),
            guest_id: Some(guest.id.clone()),
        };

        match self.polls.select_responses(&filter).await?.pop() {
            Some(mut existing) => {
                self.polls.update_response(&filter, &selected).await?;
                info!("Guest {} changed answer on poll {}", guest.id, poll.id);
                existing.selected_option = selected;
                existing.updated_at = Utc::now();
                Ok(existing)
            }
            None => {
                let response = PollResponse::new(poll.id.clone(), guest.id.clone(), selected);
                let created = self.polls.insert_response(&response).await?;
                info!("Guest {} answered poll {}", guest.id, poll.id);
                Ok(created)
            }
        }
    }

    pub async fn results(&self, poll_id: &str) -> Result<PollResults, AppError> {
        let poll = self.find_poll(poll_id).await?;
        let responses = self.polls.select_responses(&ResponseFilter {
            poll_id: Some(poll.id.clone()),
            ..Default::default()
        }).await?;

        let results = tally(poll.options(), &responses);
        Ok(PollResults {
            total_responses: results.iter().map(|r| r.count).sum(),
            poll_id: poll.id,
            question: poll.question,
            results,
        })
    }
}

pub fn resolve_choice(options: &[String], choice: &OptionChoice) -> Result<String, AppError> {
    match choice {
        OptionChoice::Index(idx) => options.get(*idx)
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("Option {} does not exist on this poll", idx))),
        OptionChoice::Value(value) => options.iter()
            .find(|o| o.eq_ignore_ascii_case(value.trim()))
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("\"{}\" is not an option on this poll", value))),
    }
}

/// Per-option counts in poll order. Percentages are rounded to the nearest
/// integer and are all zero when nobody has answered.
pub fn tally(options: &[String], responses: &[PollResponse]) -> Vec<OptionTally> {
    let counts: Vec<usize> = options.iter()
        .map(|option| responses.iter().filter(|r| &r.selected_option == option).count())
        .collect();
    let total: usize = counts.iter().sum();

    options.iter().zip(counts)
        .map(|(option, count)| OptionTally {
            option: option.clone(),
            count,
            percentage: if total == 0 { 0 } else { (count as f64 / total as f64 * 100.0).round() as u32 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(option: &str) -> PollResponse {
        PollResponse::new("poll".into(), uuid::Uuid::new_v4().to_string(), option.into())
    }

    #[test]
    fn test_tally_rounds_to_nearest() {
        let options = vec!["Yes".to_string(), "No".to_string()];
        let responses = vec![response("Yes"), response("Yes"), response("No")];

        assert_eq!(tally(&options, &responses), vec![
            OptionTally { option: "Yes".into(), count: 2, percentage: 67 },
            OptionTally { option: "No".into(), count: 1, percentage: 33 },
        ]);
    }

    #[test]
    fn test_tally_without_responses() {
        let options = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let results = tally(&options, &[]);
        assert!(results.iter().all(|r| r.count == 0 && r.percentage == 0));
    }

    #[test]
    fn test_tally_counts_sum_to_total() {
        let options = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let responses: Vec<PollResponse> = ["A", "C", "C", "B", "C", "A", "A"].iter().map(|o| response(o)).collect();
        let results = tally(&options, &responses);
        assert_eq!(results.iter().map(|r| r.count).sum::<usize>(), responses.len());
    }

    #[test]
    fn test_resolve_choice() {
        let options = vec!["Yes".to_string(), "No".to_string()];
        assert_eq!(resolve_choice(&options, &OptionChoice::Index(1)).unwrap(), "No");
        assert_eq!(resolve_choice(&options, &OptionChoice::Value(" Yes ".into())).unwrap(), "Yes");
        assert!(resolve_choice(&options, &OptionChoice::Index(2)).is_err());
        assert!(resolve_choice(&options, &OptionChoice::Value("Maybe".into())).is_err());
    }
}
