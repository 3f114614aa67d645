//! SQLite storage backend for testsink.
//!
//! Persists extracted test reports into the relational QA schema: four
//! append-only dimension tables resolved with get-or-create semantics, a
//! test fact table and a step-measurement fact table.
//!
//! ## Notes
//!
//! - **WAL mode** for concurrent readers alongside the single writer
//! - **Thread safety** via the `Arc<Mutex<Connection>>` pattern; async
//!   callers go through `tokio::task::spawn_blocking`
//! - **Atomic loads**: the whole per-report write sequence runs in one
//!   transaction, so a mid-sequence failure leaves no partial test record

pub mod config;
pub mod connection;
pub mod error;
pub mod schema;
pub mod store;

pub use config::SqliteConfig;
pub use connection::SqlitePool;
pub use error::{SqliteError, SqliteResult};
pub use store::ReportStore;
