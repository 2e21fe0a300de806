use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::collections::BTreeMap;

use roomwatch_engine::reading::SensorReading;

use super::AppState;

pub async fn latest_readings(State(state): State<AppState>) -> Json<BTreeMap<String, SensorReading>> {
    Json(state.engine.latest_readings())
}

pub async fn latest_reading(
    State(state): State<AppState>,
    Path(sensor_type): Path<String>,
) -> Result<Json<SensorReading>, StatusCode> {
    state
        .engine
        .latest_reading(&sensor_type)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn push_reading(
    State(state): State<AppState>,
    Json(reading): Json<SensorReading>,
) -> StatusCode {
    let sensor_type = reading.sensor_type.clone();
    if state.hub.submit(reading) {
        tracing::trace!(%sensor_type, "reading accepted");
        StatusCode::ACCEPTED
    } else {
        tracing::debug!(%sensor_type, "reading for unconfigured sensor");
        StatusCode::NOT_FOUND
    }
}
