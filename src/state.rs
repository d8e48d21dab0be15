use std::sync::Arc;
use crate::domain::ports::{
    CommunicationRepository, EventRepository, GuestRepository, MailTransport, PollRepository,
};
use crate::domain::services::{
    dispatch::Dispatcher, guest_batch::GuestBatchWriter, guest_service::GuestService, polls::PollService,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub guest_repo: Arc<dyn GuestRepository>,
    pub communication_repo: Arc<dyn CommunicationRepository>,
    pub poll_repo: Arc<dyn PollRepository>,
    pub mail_transport: Arc<dyn MailTransport>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn guest_service(&self) -> GuestService {
        GuestService::new(self.event_repo.clone(), self.guest_repo.clone())
    }

    pub fn batch_writer(&self) -> GuestBatchWriter {
        GuestBatchWriter::new(self.event_repo.clone(), self.guest_repo.clone())
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.mail_transport.clone(),
            self.communication_repo.clone(),
            self.templates.clone(),
            self.config.mail_from.clone(),
            self.config.public_base_url.clone(),
        )
    }

    pub fn poll_service(&self) -> PollService {
        PollService::new(self.poll_repo.clone(), self.guest_repo.clone())
    }
}
