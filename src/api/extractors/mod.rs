pub mod admin;
pub mod organizer;
