//! CLI entry point for `wherefrom`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use wherefrom::aggregate;
use wherefrom::cache::Caches;
use wherefrom::config;
use wherefrom::error::ErrorCode;
use wherefrom::render::{RenderStyle, Renderer};

#[derive(Parser)]
#[command(
    name = "wherefrom",
    version,
    about = "Show where downloaded files came from",
    long_about = "Reads the provenance metadata that browsers and mail clients \
                  attach to downloaded files (download URL, referrer, sender, \
                  downloading application, download date, security zone) and \
                  prints it per file."
)]
struct Cli {
    /// Files to inspect
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Print one JSON object instead of human-readable text
    #[arg(short, long)]
    json: bool,

    /// When to color human-readable output
    #[arg(long, value_name = "WHEN", value_parser = ["auto", "always", "never"])]
    color: Option<String>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,

    /// Generate a man page and exit
    #[arg(long)]
    manpage: bool,
}

fn exit(code: ErrorCode) -> ExitCode {
    ExitCode::from(code.exit_code() as u8)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too; they are not errors.
            let _ = e.print();
            if e.use_stderr() {
                return exit(ErrorCode::CmdLine);
            }
            return ExitCode::SUCCESS;
        }
    };

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "wherefrom", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    if cli.manpage {
        return match print_manpage() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("wherefrom: {e}");
                exit(ErrorCode::Other)
            }
        };
    }

    if cli.files.is_empty() {
        let _ = Cli::command().print_help();
        return exit(ErrorCode::CmdLine);
    }

    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.log.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    apply_color_choice(cli.color.as_deref().unwrap_or(&config.output.color));

    let style = if cli.json || config.output.format == "json" {
        RenderStyle::Json
    } else {
        RenderStyle::Human
    };

    let mut caches = Caches::new(config.lookup.quarantine_db.clone());
    let mut results = Vec::with_capacity(cli.files.len());
    let mut status: Option<ErrorCode> = None;

    for file in &cli.files {
        let (attrs, code) = aggregate::get_attributes(file, &mut caches);
        tracing::debug!(file = %file.display(), code = ?code, "inspected");
        results.push((file.display().to_string(), attrs));
        status = Some(match status {
            None => code,
            Some(acc) => acc.combine(code),
        });
    }

    let renderer = Renderer::new(config.output.max_value_bytes);
    if let Err(e) = renderer.render_all(style, &results) {
        eprintln!("wherefrom: {e}");
        return exit(ErrorCode::Other);
    }

    exit(status.unwrap_or(ErrorCode::Ok))
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &config::Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "wherefrom.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

fn apply_color_choice(choice: &str) {
    match choice {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => {} // auto: let the library detect a terminal
    }
}

/// Generate a man page and print to stdout.
fn print_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
