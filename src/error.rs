//! ==============================================================================
//! error.rs - failure taxonomy
//! ==============================================================================
//!
//! one enum per failure domain. only ingest errors ever reach an http caller;
//! everything raised inside the poll loop is logged and absorbed there.
//!
//! ==============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// inbound payload rejected at `POST /update`; store untouched
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid payload: {0}")]
    Validation(String),
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "rejected reading");
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"status": "error", "mensaje": "JSON inválido"})),
        )
            .into_response()
    }
}

/// local sensor file could not produce a reading; the cycle is skipped
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("sensor file {path} unavailable: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sensor returned non-numeric content: {0:?}")]
    Malformed(String),
}

/// relaying a reading to the hub failed; logged, never retried in-cycle
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("forward transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("hub answered with status {0}")]
    Status(reqwest::StatusCode),
}

/// unexpected failure of a whole poll cycle; triggers the extended backoff
#[derive(Debug, Error)]
pub enum PollError {
    #[error("sensor task failed to complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid listen address {0:?}")]
    InvalidAddress(String),
}
