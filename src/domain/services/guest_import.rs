//! Turns free-form guest input (plain lines, CSV with a header row, or a JSON
//! array) into validated guest drafts.
//!
//! Row-level problems never fail the whole parse: each rejected row yields one
//! `"Row N: ..."` message and parsing continues. Only structurally invalid input
//! (unparseable JSON, CSV without the required columns, no data rows at all) is
//! returned as an error.

use crate::domain::models::guest::{GuestDraft, GuestStatus};
use crate::error::AppError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Lines,
    Csv,
    Json,
}

impl InputFormat {
    /// JSON when the input opens an array, CSV when the first line is a header
    /// naming both `name` and `email`, plain lines otherwise.
    pub fn detect(raw: &str) -> Self {
        let trimmed = raw.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with('[') {
            return InputFormat::Json;
        }

        let header = trimmed.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();
        let columns: Vec<String> = split_cells(header).map(|c| c.to_ascii_lowercase()).collect();
        if columns.iter().any(|c| c == "name") && columns.iter().any(|c| c == "email") {
            InputFormat::Csv
        } else {
            InputFormat::Lines
        }
    }
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct ParsedGuests {
    pub guests: Vec<GuestDraft>,
    pub errors: Vec<String>,
}

impl ParsedGuests {
    fn push(&mut self, row: usize, outcome: Result<GuestDraft, String>) {
        match outcome {
            Ok(draft) => self.guests.push(draft),
            Err(reason) => self.errors.push(format!("Row {}: {}", row, reason)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Missing,
    NotText,
    Text(&'a str),
}

impl<'a> Cell<'a> {
    fn from_json(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Missing,
            Some(Value::String(s)) => Cell::Text(s.as_str()),
            Some(_) => Cell::NotText,
        }
    }

    fn from_position(cells: &[&'a str], index: Option<usize>) -> Self {
        match index.and_then(|i| cells.get(i)) {
            Some(cell) => Cell::Text(*cell),
            None => Cell::Missing,
        }
    }

    fn text(self) -> Option<&'a str> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }
}

pub fn parse_guest_input(raw: &str, format: Option<InputFormat>) -> Result<ParsedGuests, AppError> {
    let raw = raw.trim_start_matches('\u{feff}');
    match format.unwrap_or_else(|| InputFormat::detect(raw)) {
        InputFormat::Lines => parse_lines(raw),
        InputFormat::Csv => parse_csv(raw),
        InputFormat::Json => parse_json(raw),
    }
}

/// Validation shared by every entry point that accepts a guest.
pub fn validate_guest(name: Cell<'_>, email: Cell<'_>, status: Cell<'_>, message: Cell<'_>) -> Result<GuestDraft, String> {
    let name = match name {
        Cell::NotText => return Err("name must be text".to_string()),
        other => other.text().ok_or_else(|| "name is required".to_string())?,
    };

    let email = match email {
        Cell::NotText => return Err("email must be text".to_string()),
        other => other.text().ok_or_else(|| "email is required".to_string())?,
    };
    if !EMAIL_PATTERN.is_match(email) {
        return Err(format!("invalid email address \"{}\"", email));
    }

    let status = match status {
        Cell::NotText => return Err("status must be one of pending, confirmed, declined".to_string()),
        other => match other.text() {
            None => GuestStatus::Pending,
            Some(s) => s.parse::<GuestStatus>()
                .map_err(|_| format!("invalid status \"{}\" (expected pending, confirmed or declined)", s))?,
        },
    };

    Ok(GuestDraft {
        name: name.to_string(),
        email: email.to_string(),
        status,
        message: message.text().map(str::to_string),
    })
}

fn parse_lines(raw: &str) -> Result<ParsedGuests, AppError> {
    let mut parsed = ParsedGuests::default();
    let mut rows = 0;

    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        rows += 1;

        let cells: Vec<&str> = split_cells(line).collect();
        // Anything past the status column belongs to the message.
        let message = (cells.len() > 3).then(|| cells[3..].join(", "));
        let outcome = validate_guest(
            Cell::from_position(&cells, Some(0)),
            Cell::from_position(&cells, Some(1)),
            Cell::from_position(&cells, Some(2)),
            message.as_deref().map_or(Cell::Missing, Cell::Text),
        );
        parsed.push(idx + 1, outcome);
    }

    if rows == 0 {
        return Err(AppError::Validation("No guest rows found in the input".into()));
    }
    Ok(parsed)
}

fn parse_csv(raw: &str) -> Result<ParsedGuests, AppError> {
    let mut lines = raw.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next()
        .ok_or_else(|| AppError::Validation("CSV input is empty".into()))?;
    let columns: Vec<String> = split_cells(header).map(|c| c.to_ascii_lowercase()).collect();
    let position = |name: &str| columns.iter().position(|c| c == name);

    let (Some(name_col), Some(email_col)) = (position("name"), position("email")) else {
        return Err(AppError::Validation("CSV header must contain Name and Email columns".into()));
    };
    let status_col = position("status");
    let message_col = position("message");

    let mut parsed = ParsedGuests::default();
    let mut rows = 0;
    for (idx, line) in lines {
        rows += 1;
        let cells: Vec<&str> = split_cells(line).collect();
        let outcome = validate_guest(
            Cell::from_position(&cells, Some(name_col)),
            Cell::from_position(&cells, Some(email_col)),
            Cell::from_position(&cells, status_col),
            Cell::from_position(&cells, message_col),
        );
        parsed.push(idx + 1, outcome);
    }

    if rows == 0 {
        return Err(AppError::Validation("CSV contains a header but no guest rows".into()));
    }
    Ok(parsed)
}

fn parse_json(raw: &str) -> Result<ParsedGuests, AppError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::Validation(format!("Invalid JSON: {}", e)))?;
    let Value::Array(items) = value else {
        return Err(AppError::Validation("JSON input must be an array of guest objects".into()));
    };
    if items.is_empty() {
        return Err(AppError::Validation("JSON array contains no guests".into()));
    }

    let mut parsed = ParsedGuests::default();
    for (idx, item) in items.iter().enumerate() {
        let outcome = match item.as_object() {
            Some(obj) => validate_guest(
                Cell::from_json(obj.get("name")),
                Cell::from_json(obj.get("email")),
                // An explicit status key must name a status; blank is not "unset".
                match obj.get("status") {
                    Some(Value::String(s)) if s.trim().is_empty() => Cell::NotText,
                    other => Cell::from_json(other),
                },
                Cell::from_json(obj.get("message")),
            ),
            None => Err("expected an object with name and email".to_string()),
        };
        parsed.push(idx + 1, outcome);
    }
    Ok(parsed)
}

/// Positional comma split. Quotes are only stripped when they wrap a whole cell.
fn split_cells(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|cell| {
        let cell = cell.trim();
        if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
            cell[1..cell.len() - 1].trim()
        } else {
            cell
        }
    })
}
