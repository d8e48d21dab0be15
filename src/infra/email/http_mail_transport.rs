use crate::domain::{models::communication::OutgoingMail, ports::MailTransport};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

/// Posts each message as JSON to the mail relay configured by
/// `MAIL_SERVICE_URL`.
pub struct HttpMailTransport {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpMailTransport {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError> {
        let res = self.client.post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(mail)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Mail service connection error: {}", e);
                error!("{}", msg);
                AppError::Transport(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Mail service rejected message. Status: {}, Body: {}", status, text);
            error!(recipient = %mail.to, "{}", msg);
            return Err(AppError::Transport(msg));
        }

        debug!(recipient = %mail.to, "Mail accepted by relay");
        Ok(())
    }
}
