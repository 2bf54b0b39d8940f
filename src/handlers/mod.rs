pub mod booking;
pub mod catalog;
pub mod health;
pub mod ui;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/services", get(catalog::list_services))
        .route("/api/services/:id", get(catalog::get_service))
        .route("/api/services/:id/staff", get(catalog::get_service_staff))
        .route(
            "/api/service-types/:service_type/staff",
            get(catalog::get_staff_by_type),
        )
        .route("/api/staff/:id/slots", get(catalog::get_staff_slots))
        .route("/api/booking", get(booking::get_booking))
        .route(
            "/api/booking/form",
            get(booking::get_form)
                .patch(booking::update_form)
                .put(booking::replace_form)
                .delete(booking::clear_form),
        )
        .route("/api/booking/service", post(booking::select_service))
        .route("/api/booking/staff", post(booking::select_staff))
        .route("/api/booking/toggle-service", post(booking::toggle_service))
        .route("/api/booking/submit", post(booking::submit))
        .route("/api/booking/edit", delete(booking::stop_editing))
        .route("/api/booking/edit/:index", post(booking::start_editing))
        .route("/api/booking/reset", post(booking::reset))
        .route("/api/booking/restore", post(booking::restore))
        .route(
            "/api/booking/history",
            get(booking::get_history).delete(booking::clear_history),
        )
        .route("/api/booking/history/:index", delete(booking::remove_history_entry))
        .route(
            "/api/booking/history/:index/status",
            post(booking::set_history_status),
        )
        .route("/api/booking/statistics", get(booking::get_statistics))
        .route("/api/ui", get(ui::get_ui))
        .route("/api/ui/step", post(ui::set_step))
        .route("/api/ui/loading", post(ui::set_loading))
        .route(
            "/api/ui/errors",
            post(ui::set_form_error).delete(ui::clear_form_errors),
        )
        .route("/api/ui/modal", post(ui::open_modal).delete(ui::close_modal))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
