mod availability;
mod error;
mod http_mapping;
mod requests;
mod settings;
mod types;

pub use availability::{
    booked_slots, build_month_availability, is_slot_offered, offered_times,
    DayAvailability, MonthAvailability, SlotAvailability,
};
pub use error::BookingError;
pub use http_mapping::booking_error_to_status_code;
pub use requests::{parse_start_time, validate_email, BookDemoRequest, UpdateSettingsRequest};
pub use settings::{weekday_number, AvailabilitySettings, CustomSlots, WorkingHours};
pub use types::{Reservation, ReservationStatus, SlotKey, YearMonth, DATE_FORMAT};
