pub mod ledger;
pub mod reservations;

pub use ledger::EventLedger;
pub use reservations::{BookingCoordinator, ReservationPolicy};
