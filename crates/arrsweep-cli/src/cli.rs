//! Argument parsing, configuration bootstrap, and command dispatch.

use std::env;
use std::path::PathBuf;

use anyhow::anyhow;
use arrsweep_config::{LogFormat as ConfigLogFormat, LoggingSettings, load, load_dotenv};
use arrsweep_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, TelemetryError, init_logging};
use clap::{Parser, Subcommand, ValueEnum};

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::candidates::handle_candidates;
use crate::commands::config::handle_config;
use crate::commands::run::handle_run;

const BUILD_SHA: &str = match option_env!("ARRSWEEP_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, executes the requested command, and maps the
/// outcome to a process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            let label = if matches!(err, CliError::Partial(_)) {
                "warning"
            } else {
                "error"
            };
            eprintln!("{label}: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    load_dotenv();
    let mut config = load(cli.config.as_deref(), |key| env::var(key).ok())
        .map_err(|err| CliError::validation(format!("{:#}", anyhow::Error::new(err))))?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }

    init_telemetry(&config.logging)?;
    let _context = GlobalContextGuard::new(command_label(&cli.command));
    tracing::debug!(command = command_label(&cli.command), "configuration loaded");

    let ctx = AppContext::new(config)?;
    dispatch(&cli.command, &ctx, cli.output).await
}

async fn dispatch(command: &Command, ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    match command {
        Command::Run => handle_run(ctx, format).await,
        Command::Candidates => handle_candidates(ctx, format).await,
        Command::Config => handle_config(ctx, format),
    }
}

fn init_telemetry(settings: &LoggingSettings) -> CliResult<()> {
    let config = LoggingConfig {
        level: &settings.level,
        format: match settings.format {
            ConfigLogFormat::Pretty => LogFormat::Pretty,
            ConfigLogFormat::Json => LogFormat::Json,
        },
        build_sha: BUILD_SHA,
        file: settings.file.as_deref(),
    };
    init_logging(&config).map_err(|err| match err {
        TelemetryError::LogFileOpen { .. } => {
            CliError::validation(format!("{:#}", anyhow::Error::new(err)))
        }
        TelemetryError::SubscriberInstall { .. } => CliError::failure(anyhow!(err)),
    })
}

#[derive(Parser)]
#[command(
    name = "arrsweep",
    version,
    about = "Remove stalled qBittorrent downloads and blocklist them in Sonarr and Radarr"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "ARRSWEEP_CONFIG",
        help = "Configuration file (defaults to ./arrsweep.yaml when present)"
    )]
    config: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(long, global = true, help = "Default log filter, overridden by RUST_LOG")]
    log_level: Option<String>,
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sweep stalled torrents: resolve, blocklist, and remove them.
    Run,
    /// List the torrents a sweep would act on, without side effects.
    Candidates,
    /// Print the effective configuration with secrets redacted.
    Config,
}

/// Output format for structured command results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for ConfigLogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Run => "run",
        Command::Candidates => "candidates",
        Command::Config => "config",
    }
}
