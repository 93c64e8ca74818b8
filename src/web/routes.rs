use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

// API Routes - REST API for employee records and natural-language queries
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().nest(
        "/api",
        Router::new()
            // Employee records
            .route("/employees", get(handlers::api::list_employees))
            .route("/employees", post(handlers::api::create_employee))
            .route("/employees", delete(handlers::api::delete_employee_by_name))
            .route("/employees/{id}", get(handlers::api::get_employee))
            .route("/employees/{id}", delete(handlers::api::delete_employee))
            // Natural-language queries
            .route("/ask", post(handlers::api::ask))
            // System status
            .route("/status", get(handlers::api::system_status)),
    )
}
