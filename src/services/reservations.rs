//! Booking transaction coordinator.
//!
//! `reserve` is the only code path that inserts into `bookings`. One attempt runs
//! existence, capacity and duplicate checks plus the insert inside a single
//! transaction that holds a row lock on the event, so reserves for the same event
//! are serialized in the store itself and reserves for different events never
//! wait on each other. Nothing here relies on in-process locking: any number of
//! server instances may share the database.
//!
//! Storage failures are classified by SQLSTATE:
//!
//! | code    | meaning                | outcome                        |
//! |---------|------------------------|--------------------------------|
//! | `40001` | serialization failure  | retry, `Conflict` when spent   |
//! | `40P01` | deadlock detected      | retry, `Conflict` when spent   |
//! | `23505` | unique violation       | `Conflict` (already booked)    |
//! | `23503` | foreign key violation  | `NotFound`                     |
//! | other   |                        | internal error                 |

use sqlx::PgConnection;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    config::{BookingConfig, IsolationLevel},
    database::Database,
    errors::{AppError, AppResult},
    models::{Booking, BookingHistoryEntry, Event, ReservationReceipt},
    validation::{invalid_input, user_id_error},
};

pub const NO_SEATS_LEFT: &str = "No available seats for this event";
pub const ALREADY_BOOKED: &str = "User already has a booking for this event";
pub const CONTENDED: &str =
    "Booking could not be completed due to concurrent requests, please retry";

#[derive(Debug, Clone, Copy)]
pub struct ReservationPolicy {
    pub isolation: IsolationLevel,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl From<&BookingConfig> for ReservationPolicy {
    fn from(config: &BookingConfig) -> Self {
        ReservationPolicy {
            isolation: config.isolation_level,
            max_attempts: config.max_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

impl ReservationPolicy {
    /// Pause before attempt `attempt + 1`; grows linearly and saturates.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff.checked_mul(attempt).unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Retryable,
    Duplicate,
    MissingEvent,
    Fatal,
}

pub(crate) fn classify_sqlstate(code: Option<&str>) -> StoreFailure {
    match code {
        Some("40001") | Some("40P01") => StoreFailure::Retryable,
        Some("23505") => StoreFailure::Duplicate,
        Some("23503") => StoreFailure::MissingEvent,
        _ => StoreFailure::Fatal,
    }
}

fn classify(err: &sqlx::Error) -> StoreFailure {
    match err {
        sqlx::Error::Database(db_err) => classify_sqlstate(db_err.code().as_deref()),
        _ => StoreFailure::Fatal,
    }
}

/// Outcome of one failed attempt.
#[derive(Debug)]
enum AttemptError {
    /// Lost a race the store detected; the whole transaction may be replayed.
    Retry(sqlx::Error),
    /// Terminal for this request.
    Rejected(AppError),
}

impl AttemptError {
    fn from_store(err: sqlx::Error, event_id: i64) -> Self {
        match classify(&err) {
            StoreFailure::Retryable => AttemptError::Retry(err),
            StoreFailure::Duplicate => AttemptError::Rejected(AppError::conflict(ALREADY_BOOKED)),
            StoreFailure::MissingEvent => AttemptError::Rejected(AppError::event_not_found(event_id)),
            StoreFailure::Fatal => AttemptError::Rejected(AppError::Database(err)),
        }
    }
}

impl From<AppError> for AttemptError {
    fn from(err: AppError) -> Self {
        AttemptError::Rejected(err)
    }
}

#[derive(Clone)]
pub struct BookingCoordinator {
    db: Database,
    policy: ReservationPolicy,
}

impl BookingCoordinator {
    pub fn new(db: Database, policy: ReservationPolicy) -> Self {
        Self { db, policy }
    }

    /// Books one seat of `event_id` for `user_id`.
    ///
    /// Fails with `NotFound` when the event does not exist and with `Conflict`
    /// when the event is full, the user already holds a booking for it, or the
    /// store kept aborting the transaction for `max_attempts` attempts.
    pub async fn reserve(&self, event_id: i64, user_id: &str) -> AppResult<ReservationReceipt> {
        if event_id <= 0 {
            return Err(invalid_input("Event ID must be a positive integer"));
        }
        if let Some(message) = user_id_error(user_id) {
            return Err(invalid_input(message));
        }

        let mut attempt = 1;
        loop {
            match self.attempt(event_id, user_id).await {
                Ok(receipt) => {
                    info!(
                        booking_id = receipt.booking_id,
                        event_id,
                        attempt,
                        "Booking committed"
                    );
                    return Ok(receipt);
                }
                Err(AttemptError::Rejected(err)) => {
                    debug!(event_id, attempt, "Reservation rejected: {}", err);
                    return Err(err);
                }
                Err(AttemptError::Retry(err)) if attempt < self.policy.max_attempts => {
                    warn!(
                        event_id,
                        attempt,
                        "Booking transaction aborted by the store, retrying: {}",
                        err
                    );
                    tokio::time::sleep(self.policy.backoff(attempt)).await;
                    attempt += 1;
                }
                Err(AttemptError::Retry(err)) => {
                    warn!(
                        event_id,
                        attempts = attempt,
                        "Giving up on booking after repeated store aborts: {}",
                        err
                    );
                    return Err(AppError::conflict(CONTENDED));
                }
            }
        }
    }

    async fn attempt(&self, event_id: i64, user_id: &str) -> Result<ReservationReceipt, AttemptError> {
        let store = |e: sqlx::Error| AttemptError::from_store(e, event_id);

        let mut tx = self.db.begin(self.policy.isolation).await.map_err(store)?;

        match Self::check_and_insert(&mut tx, event_id, user_id).await {
            Ok(receipt) => {
                // Serialization failures can surface at commit time too
                tx.commit().await.map_err(store)?;
                Ok(receipt)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(event_id, "Rollback of booking transaction failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    async fn check_and_insert(
        conn: &mut PgConnection,
        event_id: i64,
        user_id: &str,
    ) -> Result<ReservationReceipt, AttemptError> {
        let store = |e: sqlx::Error| AttemptError::from_store(e, event_id);

        // 1. Существование события + блокировка строки до конца транзакции
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, name, total_seats, created_at
             FROM events
             WHERE id = $1
             FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(store)?
        .ok_or_else(|| AppError::event_not_found(event_id))?;

        // 2. Capacity
        let booked_seats = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(store)?;

        if booked_seats >= i64::from(event.total_seats) {
            return Err(AppError::conflict(NO_SEATS_LEFT).into());
        }

        // 3. Duplicate
        let already_booked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE event_id = $1 AND user_id = $2)",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(store)?;

        if already_booked {
            return Err(AppError::conflict(ALREADY_BOOKED).into());
        }

        // 4. Commit the seat; UNIQUE(event_id, user_id) still backs step 3
        let booking = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (event_id, user_id)
             VALUES ($1, $2)
             RETURNING id, event_id, user_id, created_at",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(store)?;

        Ok(ReservationReceipt::new(booking, event.name))
    }

    /// Bookings of one user, newest first.
    pub async fn user_bookings(&self, user_id: &str) -> AppResult<Vec<BookingHistoryEntry>> {
        let bookings = sqlx::query_as::<_, BookingHistoryEntry>(
            r#"
            SELECT b.id AS booking_id, b.event_id, e.name AS event_name, b.created_at
            FROM bookings b
            JOIN events e ON e.id = b.event_id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC, b.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_races_are_retryable() {
        assert_eq!(classify_sqlstate(Some("40001")), StoreFailure::Retryable);
        assert_eq!(classify_sqlstate(Some("40P01")), StoreFailure::Retryable);
    }

    #[test]
    fn constraint_violations_map_to_domain_outcomes() {
        assert_eq!(classify_sqlstate(Some("23505")), StoreFailure::Duplicate);
        assert_eq!(classify_sqlstate(Some("23503")), StoreFailure::MissingEvent);
    }

    #[test]
    fn everything_else_is_fatal() {
        assert_eq!(classify_sqlstate(Some("42P01")), StoreFailure::Fatal);
        assert_eq!(classify_sqlstate(None), StoreFailure::Fatal);
        assert_eq!(classify(&sqlx::Error::PoolTimedOut), StoreFailure::Fatal);
    }

    #[test]
    fn non_database_errors_are_not_retried() {
        match AttemptError::from_store(sqlx::Error::PoolTimedOut, 1) {
            AttemptError::Rejected(AppError::Database(_)) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn policy_never_allows_zero_attempts() {
        let policy = ReservationPolicy::from(&BookingConfig {
            isolation_level: IsolationLevel::Serializable,
            max_attempts: 0,
            retry_backoff_ms: 25,
        });

        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.isolation, IsolationLevel::Serializable);
        assert_eq!(policy.retry_backoff, Duration::from_millis(25));
    }

    #[test]
    fn backoff_is_linear_and_saturates() {
        let policy = ReservationPolicy {
            isolation: IsolationLevel::ReadCommitted,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(10),
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(10));
        assert_eq!(policy.backoff(3), Duration::from_millis(30));

        let huge = ReservationPolicy { retry_backoff: Duration::MAX, ..policy };
        assert_eq!(huge.backoff(2), Duration::MAX);
    }
}
