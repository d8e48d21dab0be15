pub mod sqlite_event_repo;
pub mod sqlite_guest_repo;
pub mod sqlite_communication_repo;
pub mod sqlite_poll_repo;

pub mod postgres_event_repo;
pub mod postgres_guest_repo;
pub mod postgres_communication_repo;
pub mod postgres_poll_repo;
