//! logfac-sinks: opens configured appenders as writable sinks.
//!
//! File appenders are opened (and created if missing) either for appending
//! or truncated for overwriting. Stream appenders wrap the process's stdout
//! or stderr. What gets written, and at which priority, belongs to the
//! logging library that consumes these sinks.

use logfac_core::{Appender, AppenderId, AppenderKind, FacilityGraph, OpenMode, StandardStream};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The path bytes do not form a path on this platform.
    #[error("invalid file path {path:?}")]
    InvalidPath { path: String },
}

/// An opened appender target.
#[derive(Debug)]
pub enum Sink {
    File(File),
    Stdout(io::Stdout),
    Stderr(io::Stderr),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::File(f) => f.write(buf),
            Sink::Stdout(s) => s.write(buf),
            Sink::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::File(f) => f.flush(),
            Sink::Stdout(s) => s.flush(),
            Sink::Stderr(s) => s.flush(),
        }
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> Result<PathBuf, SinkError> {
    use std::os::unix::ffi::OsStrExt;
    Ok(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> Result<PathBuf, SinkError> {
    std::str::from_utf8(bytes)
        .map(PathBuf::from)
        .map_err(|_| SinkError::InvalidPath {
            path: String::from_utf8_lossy(bytes).into_owned(),
        })
}

fn open_file(path: &[u8], mode: OpenMode) -> Result<File, SinkError> {
    let path = path_from_bytes(path)?;
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        OpenMode::Append => options.append(true),
        OpenMode::Overwrite => options.write(true).truncate(true),
    };
    options.open(&path).map_err(|source| SinkError::Open { path, source })
}

/// Open the target of one appender.
pub fn open_appender(appender: &Appender) -> Result<Sink, SinkError> {
    match &appender.kind {
        AppenderKind::File { path, mode } => {
            tracing::debug!(path = %String::from_utf8_lossy(path), %mode, "opening file sink");
            open_file(path, *mode).map(Sink::File)
        }
        AppenderKind::Stream(StandardStream::Stdout) => Ok(Sink::Stdout(io::stdout())),
        AppenderKind::Stream(StandardStream::Stderr) => Ok(Sink::Stderr(io::stderr())),
    }
}

/// Every appender of a graph, opened.
#[derive(Debug, Default)]
pub struct OpenSinks {
    sinks: BTreeMap<AppenderId, Sink>,
}

impl OpenSinks {
    /// Open all appenders in creation order. The first failure aborts and
    /// closes whatever was already opened.
    pub fn open_all(graph: &FacilityGraph) -> Result<Self, SinkError> {
        let mut sinks = BTreeMap::new();
        for (id, appender) in graph.appenders() {
            sinks.insert(id, open_appender(appender)?);
        }
        tracing::info!(count = sinks.len(), "sinks opened");
        Ok(Self { sinks })
    }

    pub fn get_mut(&mut self, id: AppenderId) -> Option<&mut Sink> {
        self.sinks.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn flush_all(&mut self) -> io::Result<()> {
        self.sinks.values_mut().try_for_each(Write::flush)
    }
}
