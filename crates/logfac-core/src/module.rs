//! Host-facing entry point.
//!
//! A host initialises one [`FacilityModule`] from its configuration string
//! and afterwards looks facilities up by category and name. Initialisation
//! is all-or-nothing: on error no module exists, so no half-registered
//! facility can leak. Dropping the module tears everything down.

use crate::error::Result;
use crate::model::{AppenderKind, Backend, Facility, FacilityGraph, FacilityRef};
use crate::registry::Registry;
use crate::types::{Category, OpenMode, Priority};
use serde::Serialize;

/// Identification a host reads before initialising the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: &'static str,
    pub version: u32,
    pub api_version: u32,
}

pub const MODULE_INFO: ModuleInfo = ModuleInfo {
    name: "LogHardFacility",
    version: 1,
    api_version: 1,
};

/// A fully built facility configuration.
#[derive(Debug, Clone)]
pub struct FacilityModule {
    graph: FacilityGraph,
    registry: Registry,
}

impl FacilityModule {
    /// Build from the host's configuration. `None` means no configuration,
    /// which is the same as an empty one.
    pub fn init(conf: Option<&[u8]>) -> Result<Self> {
        let (graph, registry) = crate::parse(conf.unwrap_or_default())?;
        Ok(Self { graph, registry })
    }

    pub fn find(&self, category: Category, name: impl AsRef<[u8]>) -> Option<FacilityRef<'_>> {
        self.graph.resolve(self.registry.lookup(category, name)?)
    }

    pub fn find_module_facility(&self, name: impl AsRef<[u8]>) -> Option<FacilityRef<'_>> {
        self.find(Category::Module, name)
    }

    pub fn find_pd_facility(&self, name: impl AsRef<[u8]>) -> Option<FacilityRef<'_>> {
        self.find(Category::Pd, name)
    }

    pub fn find_pdpi_facility(&self, name: impl AsRef<[u8]>) -> Option<FacilityRef<'_>> {
        self.find(Category::Pdpi, name)
    }

    pub fn find_process_facility(&self, name: impl AsRef<[u8]>) -> Option<FacilityRef<'_>> {
        self.find(Category::Process, name)
    }

    pub fn find_facilitymodule_facility(
        &self,
        name: impl AsRef<[u8]>,
    ) -> Option<FacilityRef<'_>> {
        self.find(Category::FacilityModule, name)
    }

    pub fn graph(&self) -> &FacilityGraph {
        &self.graph
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn anonymous_backends(&self) -> impl Iterator<Item = &Backend> {
        self.registry
            .anonymous()
            .iter()
            .filter_map(|&id| self.graph.backend(id))
    }

    pub fn summary(&self) -> Summary {
        Summary::new(&self.graph, &self.registry)
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Serialisable description of a built configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub backends: Vec<BackendSummary>,
    pub registrations: Vec<RegistrationSummary>,
    /// Indices of backends kept alive without a registration.
    pub anonymous: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendSummary {
    pub index: usize,
    pub priority: Option<Priority>,
    pub loggers: Vec<LoggerSummary>,
    pub appenders: Vec<AppenderSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggerSummary {
    pub index: usize,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppenderSummary {
    pub index: usize,
    /// `file`, `stdout` or `stderr`.
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<OpenMode>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationSummary {
    pub category: Category,
    pub name: String,
    /// `backend#N`, `appender#N` or `logger#N`.
    pub target: String,
}

impl Summary {
    fn new(graph: &FacilityGraph, registry: &Registry) -> Self {
        let backends = graph
            .backends()
            .map(|(id, backend)| BackendSummary {
                index: id.0,
                priority: backend.priority,
                loggers: backend
                    .loggers
                    .iter()
                    .filter_map(|&l| graph.logger(l).map(|logger| (l, logger)))
                    .map(|(l, logger)| LoggerSummary {
                        index: l.0,
                        prefix: logger.prefix_lossy().into_owned(),
                    })
                    .collect(),
                appenders: backend
                    .appenders
                    .iter()
                    .filter_map(|&a| graph.appender(a).map(|appender| (a, appender)))
                    .map(|(a, appender)| {
                        let (kind, mode) = match &appender.kind {
                            AppenderKind::File { mode, .. } => ("file".to_string(), Some(*mode)),
                            AppenderKind::Stream(stream) => (stream.to_string(), None),
                        };
                        AppenderSummary {
                            index: a.0,
                            kind,
                            path: appender.path_lossy().map(|p| p.into_owned()),
                            mode,
                            priority: appender.priority,
                        }
                    })
                    .collect(),
            })
            .collect();

        let registrations = Category::ALL
            .into_iter()
            .flat_map(|category| {
                registry
                    .names(category)
                    .into_iter()
                    .filter_map(move |name| {
                        let target = match registry.lookup(category, name)? {
                            Facility::Backend(id) => format!("backend#{}", id.0),
                            Facility::Appender(id) => format!("appender#{}", id.0),
                            Facility::Logger(id) => format!("logger#{}", id.0),
                        };
                        Some(RegistrationSummary {
                            category,
                            name: String::from_utf8_lossy(name).into_owned(),
                            target,
                        })
                    })
            })
            .collect();

        Self {
            backends,
            registrations,
            anonymous: registry.anonymous().iter().map(|id| id.0).collect(),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for backend in &self.backends {
            write!(f, "backend#{}", backend.index)?;
            if let Some(priority) = backend.priority {
                write!(f, " priority={priority}")?;
            }
            if self.anonymous.contains(&backend.index) {
                write!(f, " (anonymous)")?;
            }
            writeln!(f)?;
            for logger in &backend.loggers {
                writeln!(f, "  logger#{} prefix={:?}", logger.index, logger.prefix)?;
            }
            for appender in &backend.appenders {
                write!(f, "  appender#{} {}", appender.index, appender.kind)?;
                if let (Some(mode), Some(path)) = (appender.mode, &appender.path) {
                    write!(f, " {mode} {path:?}")?;
                }
                if let Some(priority) = appender.priority {
                    write!(f, " priority={priority}")?;
                }
                writeln!(f)?;
            }
        }
        for registration in &self.registrations {
            writeln!(
                f,
                "{} {:?} -> {}",
                registration.category, registration.name, registration.target
            )?;
        }
        Ok(())
    }
}
