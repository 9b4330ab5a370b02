//! temp-host: receive, poll, store and serve temperature readings.
//!
//! a hub receives readings over `POST /update`; a spoke additionally polls a
//! local thermal zone file and pushes each reading to its hub. both keep the
//! latest reading and a bounded history in a [`store::TelemetryStore`].

pub mod api;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod forward;
pub mod poller;
pub mod sensor;
pub mod store;
pub mod telemetry;
