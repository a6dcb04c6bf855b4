use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use super::ApiResponse;
use crate::{
    errors::AppResult,
    middleware::UserIdParam,
    models::BookingHistoryEntry,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{user_id}/bookings", get(user_bookings))
}

// GET /api/users/{user_id}/bookings
async fn user_bookings(
    State(state): State<Arc<AppState>>,
    UserIdParam(user_id): UserIdParam,
) -> AppResult<Json<ApiResponse<Vec<BookingHistoryEntry>>>> {
    let bookings = state.coordinator.user_bookings(&user_id).await?;
    Ok(Json(ApiResponse::ok(bookings)))
}
