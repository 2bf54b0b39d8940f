use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{
    BookingData, BookingFormData, BookingState, BookingStatistics, BookingStatus, FormDataPatch,
};
use crate::services::validation::validate_booking_form;
use crate::state::AppState;

/// Path indices arrive signed so that `-1` is a no-op rather than a routing error.
fn history_index(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}

// GET /api/booking
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    state: BookingState,
    has_form_data: bool,
    is_edit_mode: bool,
    editing_item: Option<BookingData>,
}

pub async fn get_booking(State(state): State<Arc<AppState>>) -> Json<BookingView> {
    let store = state.booking();
    Json(BookingView {
        state: store.state().clone(),
        has_form_data: store.has_form_data(),
        is_edit_mode: store.is_edit_mode(),
        editing_item: store.editing_item().cloned(),
    })
}

// GET /api/booking/form
pub async fn get_form(State(state): State<Arc<AppState>>) -> Json<BookingFormData> {
    Json(state.booking().form_data().clone())
}

// PATCH /api/booking/form
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<FormDataPatch>,
) -> Json<BookingFormData> {
    let mut store = state.booking();
    store.update_form_data(patch);
    Json(store.form_data().clone())
}

// PUT /api/booking/form
pub async fn replace_form(
    State(state): State<Arc<AppState>>,
    Json(form): Json<BookingFormData>,
) -> Json<BookingFormData> {
    let mut store = state.booking();
    store.set_booking_data(form);
    Json(store.form_data().clone())
}

// DELETE /api/booking/form
pub async fn clear_form(State(state): State<Arc<AppState>>) -> StatusCode {
    state.booking().clear_form_data();
    StatusCode::NO_CONTENT
}

// POST /api/booking/service
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectServiceRequest {
    pub service_id: u32,
}

pub async fn select_service(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectServiceRequest>,
) -> Result<Json<BookingFormData>, AppError> {
    if state.catalog.get_service_by_id(req.service_id).is_none() {
        return Err(AppError::NotFound(format!("service {}", req.service_id)));
    }

    let mut store = state.booking();
    store.set_selected_service(req.service_id);
    Ok(Json(store.form_data().clone()))
}

// POST /api/booking/staff
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectStaffRequest {
    pub staff_id: u32,
}

pub async fn select_staff(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectStaffRequest>,
) -> Result<Json<BookingFormData>, AppError> {
    if state.catalog.get_staff_by_id(req.staff_id).is_none() {
        return Err(AppError::NotFound(format!("staff {}", req.staff_id)));
    }

    let mut store = state.booking();
    store.set_selected_staff(req.staff_id);
    Ok(Json(store.form_data().clone()))
}

// POST /api/booking/toggle-service
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleServiceResponse {
    selected_service_ids: Vec<u32>,
}

pub async fn toggle_service(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectServiceRequest>,
) -> Json<ToggleServiceResponse> {
    let mut store = state.booking();
    store.toggle_service_selection(req.service_id);
    Json(ToggleServiceResponse {
        selected_service_ids: store.selected_service_ids().to_vec(),
    })
}

// POST /api/booking/submit
pub async fn submit(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<BookingData>), AppError> {
    let mut store = state.booking();
    let form = store.form_data().clone();

    if let Err(errors) = validate_booking_form(&form, &state.config.limits) {
        tracing::debug!(count = errors.len(), "booking form rejected");
        let mut ui = state.ui();
        ui.clear_form_errors();
        for error in &errors {
            ui.set_form_error(&error.field, &error.message);
        }
        return Err(AppError::Validation(errors));
    }

    // validation guarantees both are set
    let (Some(staff_id), Some(service_id)) = (form.selected_staff_id, form.service_id) else {
        return Err(AppError::BadRequest("incomplete booking form".into()));
    };
    if !state
        .catalog
        .is_slot_available(staff_id, &form.date, &form.time_slot)
    {
        return Err(AppError::SlotUnavailable(format!(
            "{} on {} for staff {staff_id}",
            form.time_slot, form.date
        )));
    }

    let status = if store.is_edit_mode() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let booking = store
        .add_booking(form)
        .cloned()
        .ok_or_else(|| AppError::NotFound("booking being edited".into()))?;
    store.clear_form_data();
    drop(store);

    state.ui().clear_form_errors();
    tracing::info!(id = %booking.id, service_id, staff_id, "booking submitted");
    Ok((status, Json(booking)))
}

// POST /api/booking/edit/:index
#[derive(Serialize)]
pub struct EditingResponse {
    editing: bool,
}

pub async fn start_editing(
    State(state): State<Arc<AppState>>,
    Path(index): Path<i64>,
) -> Json<EditingResponse> {
    let editing = history_index(index)
        .map(|i| state.booking().start_editing(i))
        .unwrap_or(false);
    Json(EditingResponse { editing })
}

// DELETE /api/booking/edit
pub async fn stop_editing(State(state): State<Arc<AppState>>) -> StatusCode {
    state.booking().clear_editing_item_index();
    StatusCode::NO_CONTENT
}

// POST /api/booking/reset
pub async fn reset(State(state): State<Arc<AppState>>) -> StatusCode {
    state.booking().reset_all_state();
    StatusCode::NO_CONTENT
}

// POST /api/booking/restore
pub async fn restore(State(state): State<Arc<AppState>>) -> Json<BookingFormData> {
    let mut store = state.booking();
    store.restore_page_state();
    Json(store.form_data().clone())
}

// GET /api/booking/history
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<BookingData>> {
    Json(state.booking().history().to_vec())
}

// DELETE /api/booking/history
pub async fn clear_history(State(state): State<Arc<AppState>>) -> StatusCode {
    state.booking().clear_booking_history();
    StatusCode::NO_CONTENT
}

// DELETE /api/booking/history/:index
#[derive(Serialize)]
pub struct RemovedResponse {
    removed: bool,
}

pub async fn remove_history_entry(
    State(state): State<Arc<AppState>>,
    Path(index): Path<i64>,
) -> Json<RemovedResponse> {
    let removed = history_index(index)
        .map(|i| state.booking().remove_booking_from_history(i))
        .unwrap_or(false);
    Json(RemovedResponse { removed })
}

// POST /api/booking/history/:index/status
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    updated: bool,
}

pub async fn set_history_status(
    State(state): State<Arc<AppState>>,
    Path(index): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let status = BookingStatus::parse(&req.status)
        .ok_or_else(|| AppError::BadRequest(format!("unknown status: {}", req.status)))?;

    let updated = history_index(index)
        .map(|i| state.booking().set_booking_status(i, status))
        .unwrap_or(false);
    Ok(Json(UpdatedResponse { updated }))
}

// GET /api/booking/statistics
pub async fn get_statistics(State(state): State<Arc<AppState>>) -> Json<BookingStatistics> {
    Json(state.booking().statistics(&state.catalog))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_index_rejects_negative() {
        assert_eq!(history_index(-1), None);
        assert_eq!(history_index(0), Some(0));
        assert_eq!(history_index(7), Some(7));
    }
}
