//! Persistence layer for the Aria platform.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded SQL migrations, and the interaction log: the append-only record
//! of completed conversational turns.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: no external database process required. WAL
//!   allows concurrent readers with a single writer, which matches the
//!   access pattern here: many independent turn inserts, an occasional
//!   history read.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the server and cannot drift
//!   from the code that depends on it.
//! - **Fire-and-forget writes**: the [`InteractionLog`] handle records turns
//!   on a background task; a failed write is logged and discarded, never
//!   surfaced to the turn that produced it.

mod error;
mod log;
mod migrations;
mod pool;
mod record;

pub use error::StoreError;
pub use log::InteractionLog;
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, PoolError};
pub use record::{insert_interaction, recent_interactions, InteractionRecord, StoredInteraction};
