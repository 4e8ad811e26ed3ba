//! Domain-specific assertion macros for logfac harnesses.
//!
//! These add context to failures: which configuration was being built and
//! what it failed with instead.

/// Assert that a configuration is rejected with exactly `message`.
///
/// ```rust
/// assert_rejected!("backend stdout", "loggers must precede appenders");
/// ```
#[macro_export]
macro_rules! assert_rejected {
    ($conf:expr, $message:expr) => {{
        let conf: &str = $conf;
        let expected: &str = $message;
        match logfac::FacilityModule::init(Some(conf.as_bytes())) {
            Err(err) => pretty_assertions::assert_eq!(
                err.to_string(),
                expected,
                "wrong error for configuration {:?}",
                conf
            ),
            Ok(module) => panic!(
                "assert_rejected! failed: {:?} built successfully:\n{}",
                conf,
                module.summary()
            ),
        }
    }};
}

/// Build a configuration or panic with the error it failed with.
///
/// ```rust
/// let module = built!("backend logger x module a stdout");
/// ```
#[macro_export]
macro_rules! built {
    ($conf:expr) => {{
        let conf: &str = $conf;
        match logfac::FacilityModule::init(Some(conf.as_bytes())) {
            Ok(module) => module,
            Err(err) => panic!("built! failed for {:?}: {}", conf, err),
        }
    }};
}

/// Assert that `(category, name)` resolves to the given `FacilityRef`
/// variant.
///
/// ```rust
/// assert_registered!(module, Category::Module, "crypto", Logger);
/// ```
#[macro_export]
macro_rules! assert_registered {
    ($module:expr, $category:expr, $name:expr, $variant:ident) => {{
        let module: &logfac::FacilityModule = &$module;
        let category: logfac::Category = $category;
        let name: &str = $name;
        match module.find(category, name) {
            Some(logfac::FacilityRef::$variant(_)) => {}
            Some(other) => panic!(
                "assert_registered! failed: {} {:?} is {:?}, expected {}",
                category,
                name,
                other,
                stringify!($variant)
            ),
            None => panic!(
                "assert_registered! failed: {} {:?} is not registered.\n  Registered: {:?}",
                category,
                name,
                module.registry().names(category)
            ),
        }
    }};
}
