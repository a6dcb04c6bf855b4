pub mod config;
pub mod controllers;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod validation;

use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    database::Database,
    errors::AppError,
    services::{BookingCoordinator, EventLedger, ReservationPolicy},
};

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub ledger: EventLedger,
    pub coordinator: BookingCoordinator,
}

impl AppState {
    /// Wires services to an already connected database. Migrations are the caller's job.
    pub fn new(config: &Config, db: Database) -> Arc<Self> {
        let ledger = EventLedger::new(db.clone());
        let coordinator = BookingCoordinator::new(db, ReservationPolicy::from(&config.booking));

        Arc::new(Self { ledger, coordinator })
    }
}

/// Full HTTP surface: `/health` plus everything under `/api`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(controllers::health::routes())
        .nest("/api", controllers::routes())
        .fallback(|| async { AppError::not_found("Route not found") })
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
