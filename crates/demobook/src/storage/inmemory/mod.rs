//! In-memory storage backend.
//!
//! Stores reservations and settings in maps wrapped in `Arc<RwLock<_>>`.
//! Used by tests and by local runs that don't need persistence.
//!
//! # Example
//!
//! ```rust,ignore
//! use demobook::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
