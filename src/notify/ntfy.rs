//! ntfy transport - delivers notifications over plain HTTP POST.
//!
//! One request per notification: the body is the message, everything else
//! travels in headers, which is the ntfy publish protocol. The client carries
//! a short timeout so a wedged server stalls a scan item, not the whole run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Notification, NotificationChannel};
use crate::{
    config::NotifyConfig,
    errors::{Error, Result},
};

/// The production [`NotificationChannel`], publishing to an ntfy server.
#[derive(Debug, Clone)]
pub struct NtfyChannel {
    client: Client,
}

impl NtfyChannel {
    /// Builds the transport with the configured per-request timeout.
    pub fn new(config: &NotifyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| Error::Config {
                message: format!("failed to build notification client: {err}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl NotificationChannel for NtfyChannel {
    async fn send(&self, destination: &str, note: &Notification) -> Result<()> {
        self.client
            .post(destination)
            .header("Title", &note.title)
            .header("Priority", note.priority.as_str())
            .header("Tags", &note.tags)
            .body(note.body.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
