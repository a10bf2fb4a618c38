//! `pharmadesk-observability`
//!
//! **Responsibility:** Tracing/logging wiring for host applications and
//! test harnesses.

pub mod tracing;

pub use tracing::init;
