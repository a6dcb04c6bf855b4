use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::ApiResponse;
use crate::{
    errors::AppResult,
    middleware::{EventIdParam, ValidatedJson},
    models::EventAvailability,
    validation::CreateEventRequest,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event))
}

// GET /api/events
async fn list_events(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<EventAvailability>>>> {
    let events = state.ledger.list_all().await?;
    Ok(Json(ApiResponse::ok(events)))
}

// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    EventIdParam(event_id): EventIdParam,
) -> AppResult<Json<ApiResponse<EventAvailability>>> {
    let event = state.ledger.get_by_id(event_id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

// POST /api/events
async fn create_event(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<EventAvailability>>)> {
    let event = state.ledger.create(&req.name, req.total_seats).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(EventAvailability::from(event)).with_message("Event created successfully")),
    ))
}
