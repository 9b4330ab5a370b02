//! ==============================================================================
//! api.rs - http surface
//! ==============================================================================
//!
//! routes:
//!     POST /update           ingest {"temperatura": <number>}
//!     GET  /                 html dashboard (meta refresh every 5s)
//!     GET  /api/datos        current + history + statistics
//!     GET  /api/temperatura  latest reading only
//!     POST /api/limpiar      clear history
//!
//! wire field names are spanish to stay compatible with the existing
//! dashboards and sensor nodes; the domain types stay english.
//!
//! ==============================================================================

use crate::dashboard;
use crate::domain::{Reading, Statistics};
use crate::error::IngestError;
use crate::store::TelemetryStore;

use axum::{
    body::Bytes,
    extract::State,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::CorsLayer;

pub fn router(store: TelemetryStore) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/update", post(update_handler))
        .route("/api/datos", get(datos_handler))
        .route("/api/temperatura", get(temperatura_handler))
        .route("/api/limpiar", post(limpiar_handler))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

// ==============================================================================
// wire types
// ==============================================================================

#[derive(Serialize)]
pub struct UpdateAck {
    pub status: &'static str,
    pub mensaje: &'static str,
    pub temperatura: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ReadingDto {
    pub temperatura: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&Reading> for ReadingDto {
    fn from(r: &Reading) -> Self {
        Self { temperatura: r.value, timestamp: r.timestamp }
    }
}

#[derive(Serialize)]
pub struct StatisticsDto {
    pub total_lecturas: usize,
    pub temperatura_maxima: Option<f64>,
    pub temperatura_minima: Option<f64>,
    pub temperatura_promedio: Option<f64>,
}

impl From<&Statistics> for StatisticsDto {
    fn from(s: &Statistics) -> Self {
        Self {
            total_lecturas: s.count,
            temperatura_maxima: s.max,
            temperatura_minima: s.min,
            temperatura_promedio: s.average.map(|a| (a * 100.0).round() / 100.0),
        }
    }
}

#[derive(Serialize)]
pub struct DatosResponse {
    pub temperatura_actual: Option<f64>,
    pub historial: Vec<ReadingDto>,
    pub estadisticas: StatisticsDto,
}

#[derive(Serialize)]
pub struct TemperaturaResponse {
    pub temperatura: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub status: &'static str,
}

// ==============================================================================
// handlers
// ==============================================================================

/// extract the temperature from a raw body
///
/// the body is parsed by hand so every kind of bad input (not json, not an
/// object, missing field, non-number) gets the same 400 response.
pub fn parse_temperature(body: &[u8]) -> Result<f64, IngestError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| IngestError::Validation(format!("unparseable body: {}", e)))?;

    match value.get("temperatura") {
        Some(t) => t
            .as_f64()
            .ok_or_else(|| IngestError::Validation(format!("temperatura is not a number: {}", t))),
        None => Err(IngestError::Validation("missing temperatura".to_string())),
    }
}

async fn update_handler(
    State(store): State<TelemetryStore>,
    body: Bytes,
) -> Result<Json<UpdateAck>, IngestError> {
    let value = parse_temperature(&body)?;
    // receipt time, never a client-supplied one
    let reading = store.record(value, Utc::now()).await;
    tracing::info!(value = reading.value, "📩 temperature received");

    Ok(Json(UpdateAck {
        status: "ok",
        mensaje: "Temperatura recibida",
        temperatura: reading.value,
        timestamp: reading.timestamp,
    }))
}

async fn dashboard_handler(State(store): State<TelemetryStore>) -> Html<String> {
    let snapshot = store.snapshot().await;
    Html(dashboard::render(&snapshot))
}

async fn datos_handler(State(store): State<TelemetryStore>) -> Json<DatosResponse> {
    let snapshot = store.snapshot().await;
    Json(DatosResponse {
        temperatura_actual: snapshot.current.map(|r| r.value),
        historial: snapshot.history.iter().map(ReadingDto::from).collect(),
        estadisticas: StatisticsDto::from(&snapshot.statistics),
    })
}

async fn temperatura_handler(State(store): State<TelemetryStore>) -> Json<TemperaturaResponse> {
    let response = match store.latest().await {
        Some(r) => TemperaturaResponse { temperatura: Some(r.value), timestamp: r.timestamp, status: "ok" },
        None => TemperaturaResponse { temperatura: None, timestamp: Utc::now(), status: "sin_datos" },
    };
    Json(response)
}

async fn limpiar_handler(State(store): State<TelemetryStore>) -> Json<serde_json::Value> {
    store.clear().await;
    tracing::info!("history cleared");
    Json(serde_json::json!({"status": "ok", "mensaje": "Historial limpiado"}))
}
