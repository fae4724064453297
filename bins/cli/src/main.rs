//! CLI binary entrypoint.

mod error;
mod format;

use clap::{Parser, Subcommand};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use logport_facade::{
    ErrorEnvelope, Fields, LogLevel, SharedLogger, facade_crate_version,
    load_effective_options_json, load_options, try_build_logger,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Prefix of the env vars that override logger options.
const ENV_PREFIX: &str = "LOGPORT_";
/// Env filter for the binary's own diagnostics.
const DIAGNOSTICS_ENV: &str = "LOGPORT_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "logport",
    version,
    about = "Inspect logger configuration and emit records",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Build a logger from config and emit one record through it.
    Emit(EmitArgs),
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Validate the effective logger options.
    Check {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        path: Option<PathBuf>,
        /// JSON object merged over the file and env values.
        #[arg(long)]
        overrides_json: Option<String>,
    },
    /// Print the effective logger options.
    Show {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        path: Option<PathBuf>,
        /// JSON object merged over the file and env values.
        #[arg(long)]
        overrides_json: Option<String>,
    },
}

#[derive(Debug, clap::Args)]
struct EmitArgs {
    /// Optional config file path (JSON/TOML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON object merged over the file and env values.
    #[arg(long)]
    overrides_json: Option<String>,
    /// Record level (`trace` through `panic`).
    #[arg(long, default_value = "info")]
    level: String,
    /// Record message.
    #[arg(long)]
    message: String,
    /// Attached field as `key=value`; repeatable.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,
    /// Attach an error under the configured error field.
    #[arg(long)]
    error: Option<String>,
}

#[derive(Debug)]
struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

#[derive(Debug)]
struct MessageError(String);

impl std::fmt::Display for MessageError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl std::error::Error for MessageError {}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);
    init_diagnostics();

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

/// Route the binary's own `tracing` diagnostics to stderr.
fn init_diagnostics() {
    let filter =
        EnvFilter::try_from_env(DIAGNOSTICS_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    match command {
        Commands::Info => run_info(mode),
        Commands::Config { command } => {
            let env = collect_scoped_env(ENV_PREFIX);
            match command {
                ConfigCommands::Check {
                    path,
                    overrides_json,
                } => config_check(mode, &env, path.as_deref(), overrides_json.as_deref()),
                ConfigCommands::Show {
                    path,
                    overrides_json,
                } => config_show(mode, &env, path.as_deref(), overrides_json.as_deref()),
            }
        },
        Commands::Emit(args) => {
            let env = collect_scoped_env(ENV_PREFIX);
            emit(mode, &env, args)
        },
    }
}

fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let version = facade_crate_version();
    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": version,
        });
        let mut output = serde_json::to_string_pretty(&payload)?;
        output.push('\n');
        output
    } else {
        format!("name: {}\nversion: {version}\n", env!("CARGO_PKG_NAME"))
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn config_check(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let options_json = match load_effective_options_json(env, path, overrides_json) {
        Ok(options) => options,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", mode.no_progress);

    let stdout = if mode.is_json() {
        config_payload(path, &options_json)?
    } else {
        path.map_or_else(
            || "status: ok\nconfig: ok\n".to_string(),
            |path| format!("status: ok\nconfig: ok\npath: {}\n", path.to_string_lossy()),
        )
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn config_show(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let options_json = match load_effective_options_json(env, path, overrides_json) {
        Ok(options) => options,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_json() {
        config_payload(path, &options_json)?
    } else {
        let mut output = String::from("status: ok\nconfig:\n");
        output.push_str(options_json.trim_end());
        output.push('\n');
        output
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn config_payload(path: Option<&Path>, options_json: &str) -> Result<String, CliError> {
    let options: Value = serde_json::from_str(options_json.trim())?;
    let payload = serde_json::json!({
        "status": "ok",
        "configPath": path.map(|value| value.to_string_lossy().to_string()),
        "effectiveConfig": options,
    });
    let mut output = serde_json::to_string_pretty(&payload)?;
    output.push('\n');
    Ok(output)
}

fn emit(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    args: &EmitArgs,
) -> Result<CliOutput, CliError> {
    let level = LogLevel::parse_known(&args.level)
        .ok_or_else(|| CliError::InvalidInput(format!("unknown level `{}`", args.level)))?;
    let fields = parse_fields(&args.fields)?;
    let options = load_options(env, args.config.as_deref(), args.overrides_json.as_deref())?;

    let root = try_build_logger(&options)?;
    tracing::debug!(engine = options.engine.as_str(), level = level.as_str(), "emitting record");
    let mut logger: SharedLogger = root.with_fields(&fields);
    if let Some(message) = &args.error {
        logger = logger.with_error(&MessageError(message.clone()));
    }

    let mut stderr = String::new();
    log_info(&mut stderr, "record emitted", mode.no_progress);
    let message = args.message.as_str();
    match level {
        LogLevel::Fatal => logger.fatal(format_args!("{message}")),
        LogLevel::Panic => logger.panic(format_args!("{message}")),
        level => logger.log(level, format_args!("{message}")),
    }
    logger.output().flush();

    Ok(CliOutput {
        stdout: String::new(),
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Parse `key=value` pairs; values that parse as JSON keep their type.
fn parse_fields(pairs: &[String]) -> Result<Fields, CliError> {
    let mut fields = Fields::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| CliError::InvalidInput(format!("field `{pair}` is not KEY=VALUE")))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::InvalidInput(format!("field `{pair}` has an empty key")));
        }
        let value = serde_json::from_str::<Value>(raw)
            .ok()
            .filter(|value| !value.is_object() && !value.is_array())
            .unwrap_or_else(|| Value::String(raw.to_string()));
        fields.insert(key, value);
    }
    Ok(fields)
}

fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });
        let mut output = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\"}}".to_string()
        });
        output.push('\n');
        output
    } else {
        format!(
            "status: error\ncode: {}\nmessage: {}\n",
            error.code, error.message
        )
    };

    CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::InvalidInput,
    }
}

fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

fn collect_scoped_env(prefix: &str) -> BTreeMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(prefix) && key != DIAGNOSTICS_ENV)
        .collect()
}
