use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::models::UiState;
use crate::state::AppState;

// GET /api/ui
pub async fn get_ui(State(state): State<Arc<AppState>>) -> Json<UiState> {
    Json(state.ui().state().clone())
}

// POST /api/ui/step
#[derive(Deserialize)]
pub struct StepRequest {
    pub step: u32,
}

pub async fn set_step(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Json<UiState> {
    let mut ui = state.ui();
    ui.set_step(req.step);
    Json(ui.state().clone())
}

// POST /api/ui/loading
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingRequest {
    pub is_loading: bool,
}

pub async fn set_loading(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadingRequest>,
) -> Json<UiState> {
    let mut ui = state.ui();
    ui.set_loading(req.is_loading);
    Json(ui.state().clone())
}

// POST /api/ui/errors
#[derive(Deserialize)]
pub struct FormErrorRequest {
    pub field: String,
    pub error: String,
}

pub async fn set_form_error(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FormErrorRequest>,
) -> Json<UiState> {
    let mut ui = state.ui();
    ui.set_form_error(&req.field, &req.error);
    Json(ui.state().clone())
}

// DELETE /api/ui/errors
pub async fn clear_form_errors(State(state): State<Arc<AppState>>) -> Json<UiState> {
    let mut ui = state.ui();
    ui.clear_form_errors();
    Json(ui.state().clone())
}

// POST /api/ui/modal
pub async fn open_modal(
    State(state): State<Arc<AppState>>,
    Json(content): Json<serde_json::Value>,
) -> Json<UiState> {
    let mut ui = state.ui();
    ui.open_modal(content);
    Json(ui.state().clone())
}

// DELETE /api/ui/modal
pub async fn close_modal(State(state): State<Arc<AppState>>) -> Json<UiState> {
    let mut ui = state.ui();
    ui.close_modal();
    Json(ui.state().clone())
}
