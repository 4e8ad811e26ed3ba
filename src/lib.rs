//! logfac: logging facilities from a small configuration language.
//!
//! This crate re-exports the workspace layers so that integration tests,
//! benches and the CLI can import them from one place.
//!
//! # Architecture
//!
//! ```text
//! config text ──► lexer ──► builder ──► FacilityModule ──► sinks
//!                                 │
//!                                 └──► Registry (category, name) lookups
//! ```
//!
//! Building is a single synchronous pass. Sinks are opened separately, after
//! a configuration has been accepted.

pub use logfac_core::*;
pub use logfac_sinks as sinks;
