use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use super::ApiResponse;
use crate::{
    errors::AppResult,
    middleware::ValidatedJson,
    models::ReservationReceipt,
    validation::ReserveRequest,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings/reserve", post(reserve_seat))
}

// POST /api/bookings/reserve
async fn reserve_seat(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ReserveRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReservationReceipt>>)> {
    let receipt = state.coordinator.reserve(req.event_id, &req.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(receipt).with_message("Booking created successfully")),
    ))
}
