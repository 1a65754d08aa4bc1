//! Storage layer for patterning-admin
//!
//! Remote pattern stores behind the `PatternStore` trait: a direct
//! PostgreSQL backend and a PostgREST HTTP backend.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod backend;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
mod memory;
mod pg_storage;
mod rest_storage;
pub mod traits;

pub use backend::StoreBackend;
pub use error::StorageError;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryPatternStore;
pub use pg_storage::PgPatternStore;
pub use rest_storage::{RestPatternStore, VOICING_SELECT};
pub use traits::PatternStore;
