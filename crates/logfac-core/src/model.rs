//! Object model: backends, appenders and loggers stored in one arena.
//!
//! A [`FacilityGraph`] owns every entity. Relationships and registry entries
//! refer to entities by copyable ids ([`BackendId`], [`AppenderId`],
//! [`LoggerId`]), so the same object can sit behind several registrations
//! and the anonymous collection without any of them owning it.
//!
//! Entities are only created through the `add_*` methods, which keep the
//! backend → appender/logger lists in step with the child → backend links.

use crate::types::{OpenMode, Priority, StandardStream};
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BackendId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AppenderId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LoggerId(pub usize);

/// Handle to any registrable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    Backend(BackendId),
    Appender(AppenderId),
    Logger(LoggerId),
}

/// A resolved [`Facility`] borrowed from its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityRef<'a> {
    Backend(&'a Backend),
    Appender(&'a Appender),
    Logger(&'a Logger),
}

/// Owner of a set of appenders and loggers sharing a priority threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backend {
    pub priority: Option<Priority>,
    pub appenders: Vec<AppenderId>,
    pub loggers: Vec<LoggerId>,
}

/// Where an appender writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppenderKind {
    /// A file, opened according to `mode`. The path is raw bytes since
    /// escapes can produce any byte.
    File { path: Vec<u8>, mode: OpenMode },
    Stream(StandardStream),
}

/// A log sink attached to exactly one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appender {
    pub backend: BackendId,
    pub kind: AppenderKind,
    pub priority: Option<Priority>,
}

impl Appender {
    /// File path for file appenders, lossily decoded for display.
    pub fn path_lossy(&self) -> Option<Cow<'_, str>> {
        match &self.kind {
            AppenderKind::File { path, .. } => Some(String::from_utf8_lossy(path)),
            AppenderKind::Stream(_) => None,
        }
    }
}

/// A message prefix bound to one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    pub backend: BackendId,
    pub prefix: Vec<u8>,
}

impl Logger {
    pub fn prefix_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.prefix)
    }
}

/// Arena holding every entity built from one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityGraph {
    backends: Vec<Backend>,
    appenders: Vec<Appender>,
    loggers: Vec<Logger>,
}

impl FacilityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_backend(&mut self) -> BackendId {
        self.backends.push(Backend::default());
        BackendId(self.backends.len() - 1)
    }

    /// Attach a new appender to `backend`. Returns `None` if the backend
    /// does not exist.
    pub fn add_appender(&mut self, backend: BackendId, kind: AppenderKind) -> Option<AppenderId> {
        let id = AppenderId(self.appenders.len());
        self.backends.get_mut(backend.0)?.appenders.push(id);
        self.appenders.push(Appender {
            backend,
            kind,
            priority: None,
        });
        Some(id)
    }

    /// Bind a new logger with `prefix` to `backend`. Returns `None` if the
    /// backend does not exist.
    pub fn add_logger(&mut self, backend: BackendId, prefix: Vec<u8>) -> Option<LoggerId> {
        let id = LoggerId(self.loggers.len());
        self.backends.get_mut(backend.0)?.loggers.push(id);
        self.loggers.push(Logger { backend, prefix });
        Some(id)
    }

    pub fn backend(&self, id: BackendId) -> Option<&Backend> {
        self.backends.get(id.0)
    }

    pub fn backend_mut(&mut self, id: BackendId) -> Option<&mut Backend> {
        self.backends.get_mut(id.0)
    }

    pub fn appender(&self, id: AppenderId) -> Option<&Appender> {
        self.appenders.get(id.0)
    }

    pub fn appender_mut(&mut self, id: AppenderId) -> Option<&mut Appender> {
        self.appenders.get_mut(id.0)
    }

    pub fn logger(&self, id: LoggerId) -> Option<&Logger> {
        self.loggers.get(id.0)
    }

    pub fn resolve(&self, facility: Facility) -> Option<FacilityRef<'_>> {
        match facility {
            Facility::Backend(id) => self.backend(id).map(FacilityRef::Backend),
            Facility::Appender(id) => self.appender(id).map(FacilityRef::Appender),
            Facility::Logger(id) => self.logger(id).map(FacilityRef::Logger),
        }
    }

    pub fn backends(&self) -> impl Iterator<Item = (BackendId, &Backend)> {
        self.backends.iter().enumerate().map(|(i, b)| (BackendId(i), b))
    }

    pub fn appenders(&self) -> impl Iterator<Item = (AppenderId, &Appender)> {
        self.appenders.iter().enumerate().map(|(i, a)| (AppenderId(i), a))
    }

    pub fn loggers(&self) -> impl Iterator<Item = (LoggerId, &Logger)> {
        self.loggers.iter().enumerate().map(|(i, l)| (LoggerId(i), l))
    }

    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
