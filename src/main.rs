use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use logfac::config::Settings;
use logfac::sinks::OpenSinks;
use logfac::FacilityModule;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "logfac", about = "Build and inspect logging facility configurations")]
struct Cli {
    /// Settings file (TOML) layered over the built-in defaults.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Also open every appender once the configuration is built.
    #[arg(long, global = true)]
    open_sinks: bool,
    /// Log at debug level to stderr (RUST_LOG still wins).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a configuration and print a one-line summary.
    Check {
        /// Configuration file, `-` for stdin. Defaults to the settings' text.
        file: Option<PathBuf>,
    },
    /// Print the backends, appenders, loggers and registrations built.
    Dump {
        /// Configuration file, `-` for stdin. Defaults to the settings' text.
        file: Option<PathBuf>,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.settings.as_deref()).context("loading settings")?;

    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        settings.log.filter.clone()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let (file, json) = match &cli.command {
        Command::Check { file } => (file.as_deref(), false),
        Command::Dump { file, json } => (file.as_deref(), *json),
    };
    let conf = read_configuration(file, &settings)?;
    let module =
        FacilityModule::init(Some(conf.as_slice())).context("invalid facility configuration")?;

    tracing::info!(
        backends = module.graph().backend_count(),
        registrations = module.registry().len(),
        "configuration accepted"
    );

    if cli.open_sinks || settings.facility.open_sinks {
        let mut sinks = OpenSinks::open_all(module.graph()).context("opening appenders")?;
        sinks.flush_all()?;
    }

    match cli.command {
        Command::Check { .. } => {
            let summary = module.summary();
            println!(
                "ok: {} backend(s), {} registration(s), {} anonymous",
                summary.backends.len(),
                summary.registrations.len(),
                summary.anonymous.len()
            );
        }
        Command::Dump { .. } if json => {
            println!("{}", serde_json::to_string_pretty(&module.summary())?);
        }
        Command::Dump { .. } => print!("{}", module.summary()),
    }
    Ok(())
}

fn read_configuration(file: Option<&Path>, settings: &Settings) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) if path == Path::new("-") => {
            let mut conf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut conf)
                .context("reading configuration from stdin")?;
            Ok(conf)
        }
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))
        }
        None => match settings.configuration_text()? {
            Some(conf) => Ok(conf),
            None => bail!("no configuration given: pass a file or set facility.conf"),
        },
    }
}
