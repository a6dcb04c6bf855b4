pub mod bookings;
pub mod events;
pub mod health;
pub mod users;

use axum::Router;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Everything mounted under `/api`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(bookings::routes())
        .merge(users::routes())
}

/// Success envelope shared by every JSON handler. Errors use `errors::ErrorBody`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse { success: true, data: Some(data), message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
