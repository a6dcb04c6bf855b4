//! Event ledger: the only writer of `events` rows. Availability is always
//! derived from the committed `bookings` rows, never cached.

use tracing::info;

use crate::{
    database::Database,
    errors::{AppError, AppResult},
    models::{Event, EventAvailability, EventWithCount},
    validation::{event_name_error, invalid_input},
};

const SELECT_WITH_COUNT: &str = r#"
    SELECT e.id, e.name, e.total_seats, e.created_at,
           COUNT(b.id) AS booked_seats
    FROM events e
    LEFT JOIN bookings b ON b.event_id = e.id
"#;

#[derive(Clone)]
pub struct EventLedger {
    db: Database,
}

impl EventLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, name: &str, total_seats: i32) -> AppResult<Event> {
        if let Some(message) = event_name_error(name) {
            return Err(invalid_input(message));
        }
        if total_seats <= 0 {
            return Err(invalid_input("Total seats must be a positive integer"));
        }

        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (name, total_seats)
             VALUES ($1, $2)
             RETURNING id, name, total_seats, created_at",
        )
        .bind(name)
        .bind(total_seats)
        .fetch_one(&self.db.pool)
        .await?;

        info!(event_id = event.id, total_seats, "Event created");
        Ok(event)
    }

    pub async fn get_by_id(&self, event_id: i64) -> AppResult<EventAvailability> {
        let query = format!("{SELECT_WITH_COUNT} WHERE e.id = $1 GROUP BY e.id");

        sqlx::query_as::<_, EventWithCount>(&query)
            .bind(event_id)
            .fetch_optional(&self.db.pool)
            .await?
            .map(EventAvailability::from)
            .ok_or_else(|| AppError::event_not_found(event_id))
    }

    /// Newest events first.
    pub async fn list_all(&self) -> AppResult<Vec<EventAvailability>> {
        let query = format!("{SELECT_WITH_COUNT} GROUP BY e.id ORDER BY e.created_at DESC, e.id DESC");

        let rows = sqlx::query_as::<_, EventWithCount>(&query)
            .fetch_all(&self.db.pool)
            .await?;

        Ok(rows.into_iter().map(EventAvailability::from).collect())
    }
}
