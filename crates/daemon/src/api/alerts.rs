use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use roomwatch_engine::alert::{AlertRecord, AlertSummary, ExportFormat};

use super::AppState;
use crate::scheduler::now_ms;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    pub asset_id: Option<String>,
    pub format: Option<String>,
}

pub async fn list_alerts(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Json<Vec<AlertRecord>> {
    Json(state.engine.list_alerts(q.limit))
}

pub async fn summary(State(state): State<AppState>) -> Json<AlertSummary> {
    Json(state.engine.summary(now_ms()))
}

pub async fn export(
    State(state): State<AppState>,
    Query(q): Query<ExportQuery>,
) -> Result<Response, StatusCode> {
    let format = match q.format.as_deref() {
        None => ExportFormat::Json,
        Some(f) => f.parse::<ExportFormat>().map_err(|_| StatusCode::BAD_REQUEST)?,
    };
    let body = state.engine.export(q.asset_id.as_deref(), format);
    let content_type = match format {
        ExportFormat::Json => "application/json",
        ExportFormat::Csv => "text/csv; charset=utf-8",
    };
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}
