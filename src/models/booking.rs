use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub event_id: i64,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// What a successful reserve hands back: the booking plus the event name for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationReceipt {
    pub booking_id: i64,
    pub event_id: i64,
    pub user_id: String,
    pub event_name: String,
    pub created_at: DateTime<Utc>,
}

impl ReservationReceipt {
    pub fn new(booking: Booking, event_name: String) -> Self {
        ReservationReceipt {
            booking_id: booking.id,
            event_id: booking.event_id,
            user_id: booking.user_id,
            event_name,
            created_at: booking.created_at,
        }
    }
}

// Строка истории бронирований пользователя
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BookingHistoryEntry {
    pub booking_id: i64,
    pub event_id: i64,
    pub event_name: String,
    pub created_at: DateTime<Utc>,
}
