//! ==============================================================================
//! forward.rs - push readings to the hub
//! ==============================================================================
//!
//! purpose:
//!     spokes relay every locally polled reading to a hub instance of this
//!     same service by posting `{"temperatura": <value>}` to its /update.
//!
//! failure policy:
//!     bounded timeout, one attempt, error returned to the poll loop which
//!     only logs it. the next reading goes out on the next cycle.
//!
//! ==============================================================================

use crate::domain::Reading;
use crate::error::ForwardError;

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Forwarder {
    client: reqwest::Client,
    url: String,
}

impl Forwarder {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn forward(&self, reading: &Reading) -> Result<(), ForwardError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({"temperatura": reading.value}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Status(status));
        }
        tracing::debug!(url = %self.url, value = reading.value, "reading forwarded");
        Ok(())
    }
}
