use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{Notice, Notifier, NotifyError};

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    to: &'a str,
    from: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Posts notices as JSON to an HTTP mail relay. One attempt per notice.
#[derive(Clone)]
pub struct RelayNotifier {
    client: Client,
    relay_url: String,
    token: Option<String>,
    from: String,
}

impl RelayNotifier {
    pub fn new(relay_url: String, token: Option<String>, from: String) -> Result<Self, NotifyError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            relay_url,
            token,
            from,
        })
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        let message = RelayMessage {
            to: &notice.recipient,
            from: &self.from,
            subject: &notice.subject,
            body: &notice.body,
        };

        let mut request = self.client.post(&self.relay_url).json(&message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(recipient = %notice.recipient, "Notice accepted by mail relay");
        Ok(())
    }
}
