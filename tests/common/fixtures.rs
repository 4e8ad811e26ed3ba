//! Static configuration corpora used across harnesses.

/// Configurations that must build successfully.
pub const VALID_CONFIGS: &[&str] = &[
    "",
    "   \n\t ",
    r#"backend logger "svc: " module "crypto" stdout"#,
    r#"backend logger "x" module "a" file overwrite "/tmp/out.log""#,
    "backend pd main priority normal logger 'core: ' module core pdpi core stderr",
    "backend logger a process a stdout priority debug facilitymodule a-out \
     backend logger b module b file append 'b.log' priority fatal stderr",
    "backend logger x module x stdout logger y pd y stderr logger z pdpi z",
    r#"backend logger "logger" module "module" file append "file""#,
];

/// Configurations that must be rejected, with the message they fail with.
pub const INVALID_CONFIGS: &[(&str, &str)] = &[
    ("stdout", "configuration must start with \"backend\""),
    ("backend", "a \"backend\" has no appenders defined"),
    ("backend stdout", "loggers must precede appenders"),
    ("backend logger x stdout", "a \"logger\" was not registered as a facility"),
    (
        r#"backend module "a" logger "x" module "a" stdout"#,
        "a module facility named \"a\" already exists",
    ),
    ("backend priority error priority error", "priority already set"),
    ("backend logger x priority debug", "loggers do not support \"priority\""),
    ("backend priority verbose", "invalid priority level given"),
    ("backend logger x module a file rotate x", "invalid \"file\" open mode given"),
    ("backend logger x module a file append", "incomplete \"file\" definition"),
    ("backend logger", "incomplete \"logger\" definition"),
    ("backend module", "no module facility name given"),
    ("backend logger x module a syslog", "unknown keyword \"syslog\""),
    (r#"backend logger "x"#, "unterminated quoted string"),
    (r#"backend logger "x"y"#, "trailing garbage after quoted string"),
    (r#"backend logger "\xZZ""#, "invalid hex escape"),
];

/// A larger configuration for benches: `n` backends with two loggers and
/// two appenders each.
pub fn wide_config(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "backend pd \"b{i}\" priority normal \
                 logger \"svc{i}: \" module \"svc{i}\" pdpi \"svc{i}\" \
                 file append \"/var/log/svc{i}.log\" priority debug \
                 logger 'aux{i}\\t' process aux{i} stderr\n"
            )
        })
        .collect()
}
