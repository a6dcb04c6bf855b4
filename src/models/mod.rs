pub mod booking;
pub mod event;

pub use booking::{Booking, BookingHistoryEntry, ReservationReceipt};
pub use event::{Event, EventAvailability, EventWithCount};
