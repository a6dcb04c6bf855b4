//! Resets the store to a small, known data set for manual testing.
//!
//! Existing bookings and events are deleted first.

use futures::future::try_join_all;
use tracing::info;

use seat_reservation::{config::Config, database::Database, telemetry, AppState};

const SAMPLE_EVENTS: &[(&str, i32)] = &[
    ("Tech Conference 2024", 100),
    ("Music Concert - Rock Night", 500),
    ("JavaScript Workshop", 30),
    ("Startup Pitch Competition", 150),
    ("Art Exhibition Opening", 75),
];

const SAMPLE_USERS: &[&str] = &[
    "john.doe@example.com",
    "jane.smith@example.com",
    "bob.wilson@example.com",
    "alice.brown@example.com",
    "charlie.davis@example.com",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    telemetry::init_tracing(&config.app);

    let db = Database::new(&config.database).await?;
    db.run_migrations().await?;

    info!("Cleaning existing data...");
    let mut tx = db.pool.begin().await?;
    let bookings_deleted = sqlx::query("DELETE FROM bookings").execute(&mut *tx).await?;
    let events_deleted = sqlx::query("DELETE FROM events").execute(&mut *tx).await?;
    tx.commit().await?;
    info!(
        bookings = bookings_deleted.rows_affected(),
        events = events_deleted.rows_affected(),
        "Existing data removed"
    );

    let state = AppState::new(&config, db.clone());

    let events = try_join_all(
        SAMPLE_EVENTS
            .iter()
            .map(|(name, seats)| state.ledger.create(name, *seats)),
    )
    .await?;
    info!("Created {} events", events.len());

    // The first three users each book a different event
    let bookings = try_join_all(
        events
            .iter()
            .zip(SAMPLE_USERS.iter())
            .take(3)
            .map(|(event, user_id)| state.coordinator.reserve(event.id, user_id)),
    )
    .await?;
    info!("Created {} sample bookings", bookings.len());

    for event in &events {
        info!(id = event.id, name = %event.name, seats = event.total_seats, "Event");
    }
    for user_id in SAMPLE_USERS {
        info!(user_id, "Sample user id");
    }

    db.close().await;
    info!("Database seeded successfully");
    Ok(())
}
