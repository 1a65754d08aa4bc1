//! Service layer for patterning-admin
//!
//! Fetch/delete logic and the dashboard session state machine that sits
//! between the HTTP/CLI surfaces and the pattern store.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(missing_debug_implementations, reason = "Internal types")]

mod dashboard;
mod error;
mod pattern_service;

pub use dashboard::{Confirmation, DashboardEvent, DashboardSession, DashboardState, reduce};
pub use error::ServiceError;
pub use pattern_service::PatternService;
