//! # Ripple Core Library
//!
//! Task management core built around one idea: completing a task is the
//! moment everything interesting happens. The engine gates the transition on
//! open subtasks, computes whether and when the task recurs, clones it into a
//! fresh occurrence, cascades the replication across its subtasks and copies
//! attachments onto every replica, tolerating and reporting partial
//! failures instead of aborting the whole operation.
//!
//! ## Core Modules
//!
//! - [`completion`]: the gate, replicators and orchestrator
//! - [`recurrence`]: pure interval arithmetic for occurrence windows
//! - [`models`]: core data structures and transfer objects
//! - [`store`]: task/attachment store traits and the SQLite implementation
//! - [`notify`]: the injected notification sink
//! - [`db`]: database connection and migration management
//! - [`error`]: error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ripple_core::{completion::CompletionOrchestrator, db, notify::NullSink, store::SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ripple_core::error::CoreError> {
//!     let pool = db::establish_connection("tasks.db").await?;
//!     let store = Arc::new(SqliteStore::new(pool));
//!
//!     let orchestrator =
//!         CompletionOrchestrator::new(store.clone(), store.clone(), Arc::new(NullSink));
//!     # let some_task_id = uuid::Uuid::now_v7();
//!     let (completed, report) = orchestrator.complete(some_task_id, "dana").await?;
//!     println!("completed '{}': {:?}", completed.title, report);
//!
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod recurrence;
pub mod store;
