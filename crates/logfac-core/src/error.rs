//! Error taxonomy for lexing and building a facility configuration.
//!
//! Every failure aborts the whole parse. Callers that need to tell a bad
//! configuration apart from an exhausted allocator or an internal fault use
//! [`Error::status`].

use crate::types::Category;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Malformed quoting or escaping in the configuration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated quoted string")]
    UnterminatedString,
    #[error("invalid hex escape")]
    InvalidHexEscape,
    #[error("trailing garbage after quoted string")]
    TrailingGarbage,
}

/// Grammar, ordering or uniqueness violation found while building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("configuration must start with \"backend\"")]
    MustStartWithBackend,
    #[error("a \"backend\" has no appenders defined")]
    NoAppenders,
    #[error("loggers must precede appenders")]
    LoggersMustPrecedeAppenders,
    #[error("a \"logger\" was not registered as a facility")]
    LoggerNotRegistered,
    #[error("no {0} facility name given")]
    MissingFacilityName(Category),
    #[error("a {category} facility named {name:?} already exists")]
    DuplicateFacility { category: Category, name: String },
    #[error("incomplete \"file\" definition")]
    IncompleteFile,
    #[error("invalid \"file\" open mode given")]
    InvalidOpenMode,
    #[error("incomplete \"logger\" definition")]
    IncompleteLogger,
    #[error("no priority level given")]
    MissingPriority,
    #[error("invalid priority level given")]
    InvalidPriority,
    #[error("priority already set")]
    DuplicatePriority,
    #[error("loggers do not support \"priority\"")]
    PriorityOnLogger,
    #[error("unknown keyword {0:?}")]
    UnknownKeyword(String),
}

/// Top-level error returned by [`crate::parse`] and [`crate::FacilityModule::init`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("out of memory")]
    OutOfMemory,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

/// Status a host receives from module initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    Ok,
    OutOfMemory,
    InvalidConfiguration,
    ModuleError,
}

impl Error {
    pub fn status(&self) -> InitStatus {
        match self {
            Error::Lex(_) | Error::Config(_) => InitStatus::InvalidConfiguration,
            Error::OutOfMemory => InitStatus::OutOfMemory,
            Error::Internal(_) => InitStatus::ModuleError,
        }
    }

    /// True when the configuration text itself is at fault.
    pub fn is_invalid_configuration(&self) -> bool {
        self.status() == InitStatus::InvalidConfiguration
    }
}

impl InitStatus {
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => InitStatus::Ok,
            Err(e) => e.status(),
        }
    }
}
