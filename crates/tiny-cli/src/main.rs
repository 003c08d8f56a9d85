use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use tiny_core::{CheckReport, Diagnostic, ParseOutcome};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "TINY_LOG";

/// tiny — Tiny v2 mapping file CLI
///
/// Check, dump and fingerprint Tiny v2 mapping files.
#[derive(Parser)]
#[command(name = "tiny", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a mapping file and report every defect
    Check {
        /// Path to .tiny file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the parsed mapping tree as JSON
    Dump {
        /// Path to .tiny file
        file: PathBuf,
    },

    /// Compute the SHA-256 fingerprint of a mapping
    Hash {
        /// Path to .tiny file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check { file, json } => cmd_check(&file, json),
        Commands::Dump { file } => cmd_dump(&file),
        Commands::Hash { file } => cmd_hash(&file),
        Commands::Version => {
            println!(
                "tiny {} (tiny-core {})",
                env!("CARGO_PKG_VERSION"),
                tiny_core::VERSION
            );
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Commands ──────────────────────────────────────────────

/// `check --json` output: the core report tagged with its file
#[derive(serde::Serialize)]
struct FileReport {
    file: String,
    #[serde(flatten)]
    report: CheckReport,
}

/// Exit 0 when clean, 1 with diagnostics, 2 when unreadable
fn cmd_check(file: &Path, json: bool) -> i32 {
    let outcome = match load(file) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };
    let report = outcome.check_report();
    let valid = report.valid;

    if json {
        let tagged = FileReport {
            file: file.display().to_string(),
            report,
        };
        if let Err(code) = print_json(&tagged) {
            return code;
        }
    } else {
        report_diagnostics(file, &report.diagnostics);
        match report.summary {
            Some(summary) if valid => println!(
                "{} {} is valid: {} classes, {} fields, {} methods",
                "✓".green(),
                file.display(),
                summary.classes,
                summary.fields,
                summary.methods
            ),
            _ => eprintln!("{} {}: {} error(s)", "✗".red(), file.display(), report.errors),
        }
    }

    if valid {
        0
    } else {
        1
    }
}

fn cmd_dump(file: &Path) -> i32 {
    let outcome = match load(file) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };
    report_diagnostics(file, &outcome.diagnostics);

    match outcome.mapping {
        Some(mapping) => match print_json(&mapping) {
            Ok(()) => 0,
            Err(code) => code,
        },
        None => 1,
    }
}

fn cmd_hash(file: &Path) -> i32 {
    let outcome = match load(file) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };
    let Some(mapping) = outcome.mapping else {
        report_diagnostics(file, &outcome.diagnostics);
        return 1;
    };

    match tiny_core::fingerprint(&mapping) {
        Ok(hash) => {
            println!("{}", hash);
            0
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            2
        }
    }
}

// ── Helpers ───────────────────────────────────────────────

fn load(file: &Path) -> Result<ParseOutcome, i32> {
    let outcome = tiny_core::parse_path(file).map_err(|e| {
        eprintln!("{} cannot read {}: {}", "error:".red().bold(), file.display(), e);
        2
    })?;
    tracing::debug!(
        file = %file.display(),
        has_mapping = outcome.mapping.is_some(),
        diagnostics = outcome.diagnostics.len(),
        "mapping loaded"
    );
    Ok(outcome)
}

fn report_diagnostics(file: &Path, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!(
            "{} {}:{} [{}] {}",
            "error:".red().bold(),
            file.display(),
            diagnostic.line,
            diagnostic.kind,
            diagnostic.message
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), i32> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Serialization error: {}", "error:".red().bold(), e);
            Err(2)
        }
    }
}
