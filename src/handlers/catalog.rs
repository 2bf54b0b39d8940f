use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{PriceRange, Service, StaffDisplayInfo};
use crate::state::AppState;

// GET /api/services
pub async fn list_services(State(state): State<Arc<AppState>>) -> Json<Vec<Service>> {
    Json(state.catalog.fetch_services().await)
}

// GET /api/services/:id
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    #[serde(flatten)]
    service: Service,
    price_range: Option<PriceRange>,
    staff: Vec<StaffDisplayInfo>,
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<ServiceDetail>, AppError> {
    let service = state
        .catalog
        .get_service_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

    Ok(Json(ServiceDetail {
        service: service.clone(),
        price_range: state.catalog.get_service_price_range(id),
        staff: staff_for_service(&state, id),
    }))
}

// GET /api/services/:id/staff
pub async fn get_service_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Json<Vec<StaffDisplayInfo>> {
    Json(staff_for_service(&state, id))
}

fn staff_for_service(state: &AppState, service_id: u32) -> Vec<StaffDisplayInfo> {
    state
        .catalog
        .get_staff_by_service_id(service_id)
        .into_iter()
        .map(|staff| StaffDisplayInfo::new(service_id, staff))
        .collect()
}

// GET /api/service-types/:service_type/staff
pub async fn get_staff_by_type(
    State(state): State<Arc<AppState>>,
    Path(service_type): Path<String>,
) -> Json<Vec<StaffDisplayInfo>> {
    Json(state.catalog.get_staff_by_service_type(&service_type))
}

// GET /api/staff/:id/slots?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    staff_id: u32,
    date: Option<String>,
    slots: Vec<String>,
}

pub async fn get_staff_slots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    if state.catalog.get_staff_by_id(id).is_none() {
        return Err(AppError::NotFound(format!("staff {id}")));
    }

    let slots = state.catalog.get_available_slots(id, query.date.as_deref());
    Ok(Json(SlotsResponse {
        staff_id: id,
        date: query.date,
        slots,
    }))
}
