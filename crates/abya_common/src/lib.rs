//! ABYA Common - shared types for the course evaluation service.
//!
//! The rubric tables, the weighted scorer and the HTTP API types live
//! here so the daemon and the CLI client agree on every payload.

pub mod api;
pub mod evaluation;
pub mod rubric;

pub use api::*;
pub use evaluation::*;
pub use rubric::*;
