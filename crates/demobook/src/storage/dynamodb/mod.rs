//! DynamoDB storage backend implementation.
//!
//! Single-table layout: reservations live under `BOOKINGS#<month>` and
//! settings under `SETTINGS#<month>`, both keyed by string `PK`/`SK`.

mod conversions;
mod error;
mod keys;
mod repository;

pub use repository::DynamoDbRepository;
