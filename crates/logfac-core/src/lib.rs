//! logfac-core: configuration language for logging facilities.
//!
//! A configuration string describes backends, the appenders they write to
//! and the loggers bound to them, and registers selected objects under
//! (category, name) pairs for later lookup by a host.
//!
//! # Pipeline
//!
//! ```text
//! text ──► lexer ──► tokens ──► builder ──► FacilityGraph + Registry
//! ```
//!
//! Everything runs synchronously in one pass. The first error aborts the
//! whole build.

pub mod builder;
pub mod config;
pub mod error;
pub mod lexer;
pub mod model;
pub mod module;
pub mod registry;
pub mod types;

pub use error::{ConfigError, Error, InitStatus, LexError, Result};
pub use model::{
    Appender, AppenderId, AppenderKind, Backend, BackendId, Facility, FacilityGraph, FacilityRef,
    Logger, LoggerId,
};
pub use module::{FacilityModule, ModuleInfo, Summary, MODULE_INFO};
pub use registry::Registry;
pub use types::{Category, OpenMode, Priority, StandardStream};

/// Lex and build `conf` in one go.
pub fn parse(conf: impl AsRef<[u8]>) -> Result<(FacilityGraph, Registry)> {
    let tokens = lexer::tokenize(conf.as_ref())?;
    builder::build(tokens)
}
