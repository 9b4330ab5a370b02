//! ==============================================================================
//! poller.rs - sensor poll loop
//! ==============================================================================
//!
//! purpose:
//!     periodically reads the local sensor, records the reading and (on
//!     spokes) forwards it to the hub.
//!
//! cycle contract:
//!     run_cycle() returns one explicit result per iteration:
//!     - Ok(Recorded)  reading stored (forward outcome attached)
//!     - Ok(Skipped)   sensor unreadable/malformed, store untouched
//!     - Err(PollError) unexpected failure of the cycle itself
//!     each cycle runs in its own task, so a panic anywhere in it (read,
//!     record or forward) surfaces as Err(PollError) instead of ending run().
//!     next_delay() maps that result to the sleep before the next cycle:
//!     interval for any Ok, error_backoff for Err.
//!
//! relationships:
//!     - uses: sensor.rs (SensorSource), store.rs, forward.rs
//!     - spawned by: main.rs when `sensor.enabled` is set
//!
//! ==============================================================================

use crate::domain::Reading;
use crate::error::{ForwardError, PollError, SensorError};
use crate::forward::Forwarder;
use crate::sensor::SensorSource;
use crate::store::TelemetryStore;

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub enum CycleOutcome {
    Recorded {
        reading: Reading,
        /// `None` when this node does not forward
        forwarded: Option<Result<(), ForwardError>>,
    },
    Skipped(SensorError),
}

#[derive(Clone)]
pub struct Poller {
    sensor: Arc<dyn SensorSource>,
    store: TelemetryStore,
    forwarder: Option<Forwarder>,
    interval: Duration,
    error_backoff: Duration,
    show_readings: bool,
}

impl Poller {
    pub fn new(
        sensor: Arc<dyn SensorSource>,
        store: TelemetryStore,
        interval: Duration,
        error_backoff: Duration,
    ) -> Self {
        Self {
            sensor,
            store,
            forwarder: None,
            interval,
            error_backoff,
            show_readings: true,
        }
    }

    pub fn with_forwarder(mut self, forwarder: Forwarder) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    pub fn show_readings(mut self, show: bool) -> Self {
        self.show_readings = show;
        self
    }

    /// one poll iteration
    pub async fn run_cycle(&self) -> Result<CycleOutcome, PollError> {
        let this = self.clone();
        tokio::spawn(async move { this.cycle().await }).await?
    }

    async fn cycle(&self) -> Result<CycleOutcome, PollError> {
        // file io is blocking; keep it off the request-handling workers
        let sensor = Arc::clone(&self.sensor);
        let value = match tokio::task::spawn_blocking(move || sensor.read_celsius()).await? {
            Ok(v) => v,
            Err(e) => return Ok(CycleOutcome::Skipped(e)),
        };

        let reading = self.store.record(value, Utc::now()).await;

        let forwarded = match &self.forwarder {
            Some(f) => Some(f.forward(&reading).await),
            None => None,
        };

        Ok(CycleOutcome::Recorded { reading, forwarded })
    }

    pub fn next_delay(&self, result: &Result<CycleOutcome, PollError>) -> Duration {
        match result {
            Ok(_) => self.interval,
            Err(_) => self.error_backoff,
        }
    }

    /// drive cycles for the life of the process
    pub async fn run(self) {
        tracing::info!(
            interval_s = self.interval.as_secs(),
            forwarding = self.forwarder.is_some(),
            "sensor polling started"
        );

        loop {
            let result = self.run_cycle().await;
            self.log_cycle(&result);
            tokio::time::sleep(self.next_delay(&result)).await;
        }
    }

    fn log_cycle(&self, result: &Result<CycleOutcome, PollError>) {
        match result {
            Ok(CycleOutcome::Recorded { reading, forwarded }) => {
                if self.show_readings {
                    tracing::info!(value = reading.value, "[SENSOR] Temp: {:.1}°C", reading.value);
                }
                if let Some(Err(e)) = forwarded {
                    let url = self.forwarder.as_ref().map(|f| f.url()).unwrap_or_default();
                    tracing::warn!(error = %e, url, "forward to hub failed");
                }
            }
            Ok(CycleOutcome::Skipped(e)) => {
                tracing::warn!(error = %e, "sensor read skipped");
            }
            Err(e) => {
                tracing::error!(error = %e, backoff_s = self.error_backoff.as_secs(), "poll cycle failed");
            }
        }
    }
}
