use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub total_seats: i32,
    pub created_at: DateTime<Utc>,
}

/// Event row joined with its booking count.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithCount {
    pub id: i64,
    pub name: String,
    pub total_seats: i32,
    pub booked_seats: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAvailability {
    pub id: i64,
    pub name: String,
    pub total_seats: i32,
    pub booked_seats: i64,
    pub available_seats: i64,
    pub created_at: DateTime<Utc>,
}

impl From<EventWithCount> for EventAvailability {
    fn from(row: EventWithCount) -> Self {
        let available_seats = (i64::from(row.total_seats) - row.booked_seats).max(0);
        EventAvailability {
            id: row.id,
            name: row.name,
            total_seats: row.total_seats,
            booked_seats: row.booked_seats,
            available_seats,
            created_at: row.created_at,
        }
    }
}

impl From<Event> for EventAvailability {
    fn from(event: Event) -> Self {
        EventWithCount {
            id: event.id,
            name: event.name,
            total_seats: event.total_seats,
            booked_seats: 0,
            created_at: event.created_at,
        }
        .into()
    }
}
