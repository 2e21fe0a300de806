use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use roomwatch_engine::alert::{RuleConfig, RuleConfigPatch};
use roomwatch_engine::{EngineError, RuleDescriptor};

use super::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<RuleDescriptor>> {
    Json(state.engine.rules())
}

pub async fn update_rule(
    State(state): State<AppState>,
    Path(alert_type): Path<String>,
    Json(patch): Json<RuleConfigPatch>,
) -> Result<Json<RuleConfig>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .update_rule_config(&alert_type, &patch)
        .map(Json)
        .map_err(|e| {
            let status = match e {
                EngineError::RuleNotFound(_) => StatusCode::NOT_FOUND,
                EngineError::Validation(_) | EngineError::Config(_) => StatusCode::BAD_REQUEST,
            };
            (status, Json(ErrorResponse { error: e.to_string() }))
        })
}
