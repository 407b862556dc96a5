//! tugstyle CLI binary entry point.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use tugstyle::runner::emit_response;
use tugstyle::{
    collect_java_files, run, ConfigSource, OutputErrorCode, RunOptions, Selection,
    TugstyleError,
};
use tugstyle_checks::build_rules;

// ============================================================================
// CLI Structure
// ============================================================================

/// Fix checkstyle violations in Java sources without disturbing formatting.
#[derive(Parser, Debug)]
#[command(name = "tugstyle", version)]
struct Cli {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Format of the log lines written to stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

/// How the rule configuration is supplied. Exactly one is required.
#[derive(clap::Args, Debug)]
struct ConfigArgs {
    /// Checkstyle XML configuration file.
    #[arg(short = 'f', long = "config-file")]
    config_file: Option<PathBuf>,

    /// Inline checkstyle XML configuration.
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// JSON rule list, e.g. `[{"rule": "RightCurly", "option": "same"}]`.
    #[arg(long = "rules")]
    rules_file: Option<PathBuf>,

    /// Enable every supported rule with default options.
    #[arg(long)]
    all_rules: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fix the Java files under a directory (or a single file) in place.
    Fix {
        /// Directory or file to fix.
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Only fix files whose path relative to PATH matches this glob.
        #[arg(short = 'r', long)]
        glob: Option<String>,

        /// Fix at most this many files.
        #[arg(short = 'l', long)]
        limit: Option<usize>,

        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,

        /// Output format for the report.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the configured rules as JSON.
    Rules {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.log_level, cli.log_format);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            eprintln!("tugstyle: {err}");
            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), TugstyleError> {
    match cli.command {
        Command::Fix {
            path,
            config,
            glob,
            limit,
            dry_run,
            format,
        } => execute_fix(path, config, Selection { glob, limit }, dry_run, format),
        Command::Rules { config } => execute_rules(config),
    }
}

fn config_source(args: ConfigArgs) -> Result<ConfigSource, TugstyleError> {
    ConfigSource::select(args.config_file, args.config, args.rules_file, args.all_rules)
}

fn execute_fix(
    path: PathBuf,
    config: ConfigArgs,
    selection: Selection,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), TugstyleError> {
    let configs = config_source(config)?.load()?;
    let rules = build_rules(&configs);
    let files = collect_java_files(&path, &selection)?;

    let report = run(&files, &rules, RunOptions { dry_run })?;

    let mut stdout = io::stdout();
    let written = match format {
        OutputFormat::Text => write!(stdout, "{}", report.render_text()),
        OutputFormat::Json => emit_response(&report, &mut stdout),
    };
    written.map_err(|e| TugstyleError::internal(e.to_string()))?;
    let _ = stdout.flush();

    Ok(())
}

fn execute_rules(config: ConfigArgs) -> Result<(), TugstyleError> {
    let configs = config_source(config)?.load()?;
    emit_response(&configs, &mut io::stdout())
        .map_err(|e| TugstyleError::internal(e.to_string()))?;
    let _ = io::stdout().flush();
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_defaults() {
        let cli = Cli::try_parse_from(["tugstyle", "fix", "--all-rules"]).unwrap();
        match cli.command {
            Command::Fix {
                path,
                config,
                glob,
                limit,
                dry_run,
                format,
            } => {
                assert_eq!(path, PathBuf::from("."));
                assert!(config.all_rules);
                assert!(glob.is_none() && limit.is_none());
                assert!(!dry_run);
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn fix_short_options() {
        let cli = Cli::try_parse_from([
            "tugstyle", "fix", "src", "-f", "checks.xml", "-r", "**/*Test.java", "-l", "5",
        ])
        .unwrap();
        match cli.command {
            Command::Fix {
                path,
                config,
                glob,
                limit,
                ..
            } => {
                assert_eq!(path, PathBuf::from("src"));
                assert_eq!(config.config_file, Some(PathBuf::from("checks.xml")));
                assert_eq!(glob.as_deref(), Some("**/*Test.java"));
                assert_eq!(limit, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_log_options() {
        let cli = Cli::try_parse_from([
            "tugstyle", "rules", "-c", "<module/>", "--log-level", "debug", "--log-format",
            "json",
        ])
        .unwrap();
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_config_is_an_argument_error() {
        let cli = Cli::try_parse_from(["tugstyle", "fix"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
    }
}
