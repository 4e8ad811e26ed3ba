//! Builder: walks the token stream and materialises the facility graph.
//!
//! Grammar (bare keywords in quotes, `<x>` is any single token):
//!
//! ```text
//! CONFIG    ::= BACKEND*
//! BACKEND   ::= "backend" PLACE* PRIORITY? PLACE* LOGGER+ APPENDER+ (LOGGER | APPENDER)*
//! PLACE     ::= ("module" | "pd" | "pdpi" | "process" | "facilitymodule") <name>
//! PRIORITY  ::= "priority" ("fatal" | "error" | "warning" | "normal" | "debug" | "fulldebug")
//! LOGGER    ::= "logger" <prefix> PLACE+
//! APPENDER  ::= ("file" ("append" | "overwrite") <path> | "stdout" | "stderr") PLACE* PRIORITY? PLACE*
//! ```
//!
//! The builder is a single dispatch loop over the next keyword. [`Mode`]
//! tracks which entity was created last (places and priorities apply to it)
//! and [`BackendState`] the per-backend ordering flags. The first violation
//! aborts the build and nothing built so far escapes.

use crate::error::{ConfigError, Error, Result};
use crate::lexer::Token;
use crate::model::{AppenderId, AppenderKind, BackendId, Facility, FacilityGraph, LoggerId};
use crate::registry::Registry;
use crate::types::{Category, OpenMode, Priority, StandardStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Backend,
    Place(Category),
    Priority,
    File,
    Stream(StandardStream),
    Logger,
}

static KEYWORDS: phf::Map<&'static [u8], Keyword> = phf::phf_map! {
    b"backend" => Keyword::Backend,
    b"module" => Keyword::Place(Category::Module),
    b"pd" => Keyword::Place(Category::Pd),
    b"pdpi" => Keyword::Place(Category::Pdpi),
    b"process" => Keyword::Place(Category::Process),
    b"facilitymodule" => Keyword::Place(Category::FacilityModule),
    b"priority" => Keyword::Priority,
    b"file" => Keyword::File,
    b"stdout" => Keyword::Stream(StandardStream::Stdout),
    b"stderr" => Keyword::Stream(StandardStream::Stderr),
    b"logger" => Keyword::Logger,
};

impl Keyword {
    /// Quoted tokens are never keywords.
    fn of(token: &Token<'_>) -> Option<Self> {
        if token.quoted() {
            return None;
        }
        KEYWORDS.get(token.text()).copied()
    }
}

/// The most recently created entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Backend,
    Appender { id: AppenderId, has_priority: bool },
    Logger { id: LoggerId, has_place: bool },
}

#[derive(Debug, Clone, Copy)]
struct BackendState {
    id: BackendId,
    has_place: bool,
    has_loggers: bool,
    has_appenders: bool,
    has_priority: bool,
}

impl BackendState {
    fn new(id: BackendId) -> Self {
        Self {
            id,
            has_place: false,
            has_loggers: false,
            has_appenders: false,
            has_priority: false,
        }
    }
}

/// Build a facility graph and its registrations from lexed tokens.
pub fn build(tokens: Vec<Token<'_>>) -> Result<(FacilityGraph, Registry)> {
    Builder::new(tokens).run()
}

struct Builder<'a> {
    tokens: std::vec::IntoIter<Token<'a>>,
    graph: FacilityGraph,
    registry: Registry,
    backend: Option<BackendState>,
    mode: Mode,
}

impl<'a> Builder<'a> {
    fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            graph: FacilityGraph::new(),
            registry: Registry::new(),
            backend: None,
            mode: Mode::Backend,
        }
    }

    fn run(mut self) -> Result<(FacilityGraph, Registry)> {
        let Some(first) = self.tokens.next() else {
            return Ok((self.graph, self.registry));
        };
        if Keyword::of(&first) != Some(Keyword::Backend) {
            return Err(ConfigError::MustStartWithBackend.into());
        }
        self.begin_backend();

        while let Some(token) = self.tokens.next() {
            match Keyword::of(&token) {
                Some(Keyword::Backend) => {
                    self.finish_backend()?;
                    self.begin_backend();
                }
                Some(Keyword::Place(category)) => self.place(category)?,
                Some(Keyword::Priority) => self.priority()?,
                Some(Keyword::File) => self.file()?,
                Some(Keyword::Stream(stream)) => {
                    self.check_appender_allowed()?;
                    self.attach(AppenderKind::Stream(stream))?;
                }
                Some(Keyword::Logger) => self.logger()?,
                None => {
                    return Err(ConfigError::UnknownKeyword(token.text_lossy().into_owned()).into())
                }
            }
        }
        self.finish_backend()?;

        tracing::info!(
            backends = self.graph.backend_count(),
            registrations = self.registry.len(),
            anonymous = self.registry.anonymous().len(),
            "facility configuration built"
        );
        Ok((self.graph, self.registry))
    }

    fn state(&self) -> Result<&BackendState> {
        self.backend.as_ref().ok_or_else(no_backend)
    }

    fn state_mut(&mut self) -> Result<&mut BackendState> {
        self.backend.as_mut().ok_or_else(no_backend)
    }

    fn begin_backend(&mut self) {
        let id = self.graph.add_backend();
        tracing::debug!(backend = id.0, "backend");
        self.backend = Some(BackendState::new(id));
        self.mode = Mode::Backend;
    }

    /// Checks run when a backend block ends, at the next `backend` or at
    /// the end of input.
    fn finish_backend(&self) -> Result<()> {
        if !self.state()?.has_appenders {
            return Err(ConfigError::NoAppenders.into());
        }
        self.check_logger_placed()
    }

    fn check_logger_placed(&self) -> Result<()> {
        match self.mode {
            Mode::Logger {
                has_place: false, ..
            } => Err(ConfigError::LoggerNotRegistered.into()),
            _ => Ok(()),
        }
    }

    fn check_appender_allowed(&self) -> Result<()> {
        if !self.state()?.has_loggers {
            return Err(ConfigError::LoggersMustPrecedeAppenders.into());
        }
        self.check_logger_placed()
    }

    fn place(&mut self, category: Category) -> Result<()> {
        let name = self
            .tokens
            .next()
            .ok_or(ConfigError::MissingFacilityName(category))?;
        let facility = match self.mode {
            Mode::Backend => Facility::Backend(self.state()?.id),
            Mode::Appender { id, .. } => Facility::Appender(id),
            Mode::Logger { id, .. } => Facility::Logger(id),
        };
        self.registry.register(category, name.text(), facility)?;

        match self.mode {
            Mode::Backend => self.state_mut()?.has_place = true,
            Mode::Logger { id, .. } => {
                self.mode = Mode::Logger {
                    id,
                    has_place: true,
                }
            }
            Mode::Appender { .. } => {}
        }
        Ok(())
    }

    fn priority(&mut self) -> Result<()> {
        // `None` targets the current backend.
        let (target, already_set) = match self.mode {
            Mode::Logger { .. } => return Err(ConfigError::PriorityOnLogger.into()),
            Mode::Backend => (None, self.state()?.has_priority),
            Mode::Appender { id, has_priority } => (Some(id), has_priority),
        };
        if already_set {
            return Err(ConfigError::DuplicatePriority.into());
        }

        let level = self.tokens.next().ok_or(ConfigError::MissingPriority)?;
        let priority = match level.quoted() {
            true => None,
            false => Priority::from_keyword(level.text()),
        }
        .ok_or(ConfigError::InvalidPriority)?;

        match target {
            None => {
                let state = self.state_mut()?;
                state.has_priority = true;
                let id = state.id;
                self.graph.backend_mut(id).ok_or_else(no_backend)?.priority = Some(priority);
            }
            Some(id) => {
                self.mode = Mode::Appender {
                    id,
                    has_priority: true,
                };
                self.graph
                    .appender_mut(id)
                    .ok_or_else(|| Error::Internal(format!("appender {} missing", id.0)))?
                    .priority = Some(priority);
            }
        }
        tracing::debug!(%priority, "priority set");
        Ok(())
    }

    fn file(&mut self) -> Result<()> {
        self.check_appender_allowed()?;
        let token = self.tokens.next().ok_or(ConfigError::IncompleteFile)?;
        let open_mode = match token.quoted() {
            true => None,
            false => OpenMode::from_keyword(token.text()),
        }
        .ok_or(ConfigError::InvalidOpenMode)?;
        let path = self
            .tokens
            .next()
            .ok_or(ConfigError::IncompleteFile)?
            .into_bytes();
        self.attach(AppenderKind::File {
            path,
            mode: open_mode,
        })
    }

    /// Create an appender on the current backend and make it current.
    fn attach(&mut self, kind: AppenderKind) -> Result<()> {
        let backend = self.state()?.id;
        tracing::debug!(backend = backend.0, ?kind, "appender");
        let id = self
            .graph
            .add_appender(backend, kind)
            .ok_or_else(no_backend)?;
        self.state_mut()?.has_appenders = true;
        self.mode = Mode::Appender {
            id,
            has_priority: false,
        };
        Ok(())
    }

    fn logger(&mut self) -> Result<()> {
        let state = self.state_mut()?;
        if !state.has_place {
            state.has_place = true;
            let id = state.id;
            self.registry.add_anonymous(id);
        }
        self.check_logger_placed()?;

        let prefix = self
            .tokens
            .next()
            .ok_or(ConfigError::IncompleteLogger)?
            .into_bytes();
        let backend = self.state()?.id;
        tracing::debug!(
            backend = backend.0,
            prefix = %String::from_utf8_lossy(&prefix),
            "logger"
        );
        let id = self
            .graph
            .add_logger(backend, prefix)
            .ok_or_else(no_backend)?;
        self.state_mut()?.has_loggers = true;
        self.mode = Mode::Logger {
            id,
            has_place: false,
        };
        Ok(())
    }
}

fn no_backend() -> Error {
    Error::Internal("no active backend".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::model::FacilityRef;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(input: &str) -> Result<(FacilityGraph, Registry)> {
        build(tokenize(input.as_bytes())?)
    }

    fn config_error(input: &str) -> ConfigError {
        match parse(input) {
            Err(Error::Config(e)) => e,
            Err(other) => panic!("expected a config error for {input:?}, got {other:?}"),
            Ok(_) => panic!("expected {input:?} to be rejected"),
        }
    }

    #[test]
    fn empty_configuration_builds_nothing() {
        let (graph, registry) = parse("").unwrap();
        assert!(graph.is_empty());
        assert!(registry.is_empty());
        assert!(registry.anonymous().is_empty());
    }

    #[test]
    fn minimal_backend_is_anonymous() {
        let (graph, registry) = parse(r#"backend logger "svc: " module "crypto" stdout"#).unwrap();
        assert_eq!(graph.backend_count(), 1);
        assert_eq!(registry.anonymous(), &[BackendId(0)]);

        let Some(Facility::Logger(id)) = registry.lookup(Category::Module, "crypto") else {
            panic!("crypto should be a logger");
        };
        let logger = graph.logger(id).unwrap();
        assert_eq!(logger.prefix, b"svc: ");

        let backend = graph.backend(logger.backend).unwrap();
        assert_eq!(backend.appenders.len(), 1);
        let appender = graph.appender(backend.appenders[0]).unwrap();
        assert_eq!(appender.kind, AppenderKind::Stream(StandardStream::Stdout));
    }

    #[test]
    fn named_backend_is_not_anonymous() {
        let (graph, registry) =
            parse(r#"backend pd "b" logger x module l stderr pdpi "e""#).unwrap();
        assert!(registry.anonymous().is_empty());
        assert_eq!(
            registry.lookup(Category::Pd, "b"),
            Some(Facility::Backend(BackendId(0)))
        );
        let Some(Facility::Appender(id)) = registry.lookup(Category::Pdpi, "e") else {
            panic!("e should be an appender");
        };
        assert!(matches!(
            graph.resolve(Facility::Appender(id)),
            Some(FacilityRef::Appender(_))
        ));
    }

    #[test]
    fn file_appender_records_mode_and_path() {
        let (graph, _) = parse(r#"backend logger "x" module "a" file overwrite "/tmp/out.log""#).unwrap();
        let (_, appender) = graph.appenders().next().unwrap();
        assert_eq!(
            appender.kind,
            AppenderKind::File {
                path: b"/tmp/out.log".to_vec(),
                mode: OpenMode::Overwrite,
            }
        );
    }

    #[test]
    fn priorities_apply_to_backend_and_appender() {
        let (graph, _) = parse(
            "backend priority warning logger x module a stdout priority fulldebug stderr",
        )
        .unwrap();
        let (_, backend) = graph.backends().next().unwrap();
        assert_eq!(backend.priority, Some(Priority::Warning));
        let priorities: Vec<_> = graph.appenders().map(|(_, a)| a.priority).collect();
        assert_eq!(priorities, vec![Some(Priority::FullDebug), None]);
    }

    #[test]
    fn multiple_backends_each_get_their_own_children() {
        let (graph, registry) = parse(
            "backend logger a module a stdout \
             backend module b2 logger b module b stderr logger c pd c file append log",
        )
        .unwrap();
        assert_eq!(graph.backend_count(), 2);
        assert_eq!(registry.anonymous(), &[BackendId(0)]);
        let second = graph.backend(BackendId(1)).unwrap();
        assert_eq!(second.loggers.len(), 2);
        assert_eq!(second.appenders.len(), 2);
    }

    #[test]
    fn quoted_keywords_are_plain_values() {
        let (graph, registry) =
            parse(r#"backend logger "logger" module "module" file append "file""#).unwrap();
        assert!(registry.lookup(Category::Module, "module").is_some());
        let (_, appender) = graph.appenders().next().unwrap();
        assert_eq!(appender.path_lossy().as_deref(), Some("file"));
    }

    #[rstest]
    #[case::bare_value("stdout")]
    #[case::quoted_backend(r#""backend" logger x module a stdout"#)]
    fn must_start_with_backend(#[case] input: &str) {
        assert_eq!(config_error(input), ConfigError::MustStartWithBackend);
    }

    #[rstest]
    #[case::alone("backend")]
    #[case::before_next_backend("backend backend logger x module a stdout")]
    #[case::loggers_only("backend logger x module a")]
    fn backend_without_appenders(#[case] input: &str) {
        assert_eq!(config_error(input), ConfigError::NoAppenders);
    }

    #[rstest]
    #[case::stdout("backend stdout")]
    #[case::stderr("backend module a stderr")]
    #[case::file("backend priority debug file append x")]
    fn appender_before_logger(#[case] input: &str) {
        assert_eq!(config_error(input), ConfigError::LoggersMustPrecedeAppenders);
    }

    #[rstest]
    #[case::before_appender("backend logger x stdout")]
    #[case::before_logger("backend logger x logger y module a stdout")]
    #[case::at_end("backend logger x module a stdout logger y")]
    #[case::before_backend("backend logger x module a stdout logger y backend")]
    fn logger_without_place(#[case] input: &str) {
        assert_eq!(config_error(input), ConfigError::LoggerNotRegistered);
    }

    #[test]
    fn duplicate_registration_fails() {
        assert_eq!(
            config_error(r#"backend module "a" logger "x" module "a" stdout"#),
            ConfigError::DuplicateFacility {
                category: Category::Module,
                name: "a".into()
            }
        );
    }

    #[test]
    fn aliasing_one_entity_resolves_to_same_handle() {
        let (_, registry) =
            parse("backend logger x module a module b pd a process p facilitymodule f stdout")
                .unwrap();
        let handle = registry.lookup(Category::Module, "a");
        assert!(handle.is_some());
        for (category, name) in [
            (Category::Module, "b"),
            (Category::Pd, "a"),
            (Category::Process, "p"),
            (Category::FacilityModule, "f"),
        ] {
            assert_eq!(registry.lookup(category, name), handle);
        }
    }

    #[rstest]
    #[case::backend("backend priority error priority error logger x module a stdout")]
    #[case::appender("backend logger x module a stdout priority fatal priority fatal")]
    #[case::appender_split_by_place("backend logger x module a stdout priority fatal pd p priority debug")]
    fn priority_twice(#[case] input: &str) {
        assert_eq!(config_error(input), ConfigError::DuplicatePriority);
    }

    #[rstest]
    #[case::valid_level("backend logger x priority debug")]
    #[case::invalid_level("backend logger x priority loud")]
    #[case::after_place("backend logger x module a priority debug stdout")]
    fn priority_on_logger(#[case] input: &str) {
        assert_eq!(config_error(input), ConfigError::PriorityOnLogger);
    }

    #[rstest]
    #[case::unknown("backend priority loud")]
    #[case::quoted(r#"backend priority "debug""#)]
    #[case::wrong_case("backend priority Debug")]
    fn invalid_priority(#[case] input: &str) {
        assert_eq!(config_error(input), ConfigError::InvalidPriority);
    }

    #[test]
    fn missing_values() {
        assert_eq!(config_error("backend priority"), ConfigError::MissingPriority);
        assert_eq!(
            config_error("backend pdpi"),
            ConfigError::MissingFacilityName(Category::Pdpi)
        );
        assert_eq!(config_error("backend logger"), ConfigError::IncompleteLogger);
        assert_eq!(
            config_error("backend logger x module a file"),
            ConfigError::IncompleteFile
        );
        assert_eq!(
            config_error("backend logger x module a file append"),
            ConfigError::IncompleteFile
        );
    }

    #[rstest]
    #[case::unknown("backend logger x module a file truncate x")]
    #[case::quoted(r#"backend logger x module a file "append" x"#)]
    fn invalid_open_mode(#[case] input: &str) {
        assert_eq!(config_error(input), ConfigError::InvalidOpenMode);
    }

    #[rstest]
    #[case::bare("backend logger x module a stdout syslog")]
    #[case::quoted(r#"backend logger x module a "stdout""#)]
    #[case::wrong_case("backend logger x module a STDOUT")]
    fn unknown_keyword(#[case] input: &str) {
        assert!(matches!(config_error(input), ConfigError::UnknownKeyword(_)));
    }

    #[test]
    fn lex_errors_surface_before_building() {
        assert!(matches!(
            parse(r#"backend logger "x"#),
            Err(Error::Lex(crate::error::LexError::UnterminatedString))
        ));
    }
}
