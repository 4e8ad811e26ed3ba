//! Core value types for logfac-core.
//!
//! This module defines the small closed vocabularies shared by the lexer,
//! builder and registry: the facility [`Category`] a place registers into,
//! the [`Priority`] threshold levels, the file [`OpenMode`], and the
//! [`StandardStream`] discriminant for stream appenders.

use serde::Serialize;

/// Lookup table a facility can be registered into.
///
/// The keyword spelling (`module`, `pd`, `pdpi`, `process`, `facilitymodule`)
/// is what appears in the configuration text after a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Module,
    Pd,
    Pdpi,
    Process,
    FacilityModule,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 5] = [
        Category::Module,
        Category::Pd,
        Category::Pdpi,
        Category::Process,
        Category::FacilityModule,
    ];

    /// The configuration keyword that selects this category.
    pub fn keyword(self) -> &'static str {
        match self {
            Category::Module => "module",
            Category::Pd => "pd",
            Category::Pdpi => "pdpi",
            Category::Process => "process",
            Category::FacilityModule => "facilitymodule",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Priority threshold of a backend or appender.
///
/// Variants are declared from most to least severe, so `Fatal < FullDebug`.
/// What a threshold means for emitted records is up to the logging library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Fatal,
    Error,
    Warning,
    Normal,
    Debug,
    FullDebug,
}

static PRIORITY_KEYWORDS: phf::Map<&'static [u8], Priority> = phf::phf_map! {
    b"fatal" => Priority::Fatal,
    b"error" => Priority::Error,
    b"warning" => Priority::Warning,
    b"normal" => Priority::Normal,
    b"debug" => Priority::Debug,
    b"fulldebug" => Priority::FullDebug,
};

impl Priority {
    /// Resolve a level keyword. Matching is exact and case-sensitive.
    pub fn from_keyword(keyword: &[u8]) -> Option<Self> {
        PRIORITY_KEYWORDS.get(keyword).copied()
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Priority::Fatal => "fatal",
            Priority::Error => "error",
            Priority::Warning => "warning",
            Priority::Normal => "normal",
            Priority::Debug => "debug",
            Priority::FullDebug => "fulldebug",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How a file appender opens its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    /// Keep existing content and write at the end.
    Append,
    /// Truncate the file on open.
    Overwrite,
}

impl OpenMode {
    pub fn from_keyword(keyword: &[u8]) -> Option<Self> {
        match keyword {
            b"append" => Some(OpenMode::Append),
            b"overwrite" => Some(OpenMode::Overwrite),
            _ => None,
        }
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenMode::Append => write!(f, "append"),
            OpenMode::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Which process stream a stream appender writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardStream {
    Stdout,
    Stderr,
}

impl std::fmt::Display for StandardStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandardStream::Stdout => write!(f, "stdout"),
            StandardStream::Stderr => write!(f, "stderr"),
        }
    }
}
