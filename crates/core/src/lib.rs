//! Functional core of the demobook booking service.
//!
//! Everything here is pure: domain types, slot arithmetic, validation,
//! message rendering, and the traits the service shell implements for
//! storage and mail.

pub mod auth;
pub mod booking;
pub mod mail;
pub mod serde;
pub mod storage;
