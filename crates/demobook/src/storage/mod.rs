//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `demobook_core::storage`, selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): process-local maps, for tests and local runs
//! - `dynamodb`: AWS DynamoDB single-table backend using `aws-sdk-dynamodb`
//!
//! These features are mutually exclusive.
//!
//! # Examples
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p demobook --no-default-features --features dynamodb,ses
//! ```

#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!(
    "Features 'inmemory' and 'dynamodb' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p demobook --features dynamodb"
);

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;
