mod settings;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use sdui::{
    Document, DocumentBinder, LogSink, Payload, ValidationResult, flatten,
    validate_json,
};
use serde::Serialize;

use crate::settings::{Settings, SettingsLoadStatus, load_settings};

#[derive(Parser)]
#[command(name = "sdui")]
#[command(about = "Checks and previews for server-driven UI documents")]
struct Cli {
    /// Settings file to use instead of the default sdui/settings.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate node or document JSON files
    Check {
        /// Files to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Report fields the decoder would ignore
        #[arg(long)]
        strict: bool,
        /// Fail when any file has warnings
        #[arg(long)]
        deny_warnings: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the node tree with derived ids
    Outline {
        file: PathBuf,
    },
    /// Bind a document, invoke behaviors in order and print the final state
    Invoke {
        file: PathBuf,
        /// Behavior names, invoked left to right
        behaviors: Vec<String>,
    },
    /// Print the effective settings
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Keeps stdout for the state snapshot: `Log` actions go to stderr.
struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, message: &str) {
        eprintln!("{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!(target: "sdui::dispatch", "{message}");
    }
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let settings = resolve_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            files,
            strict,
            deny_warnings,
            format,
        } => check(&settings, &files, strict, deny_warnings, format),
        Commands::Outline { file } => outline(&file),
        Commands::Invoke { file, behaviors } => {
            invoke(&settings, &file, &behaviors)
        },
        Commands::Config => {
            println!("{}", settings.to_json_pretty()?);
            Ok(ExitCode::SUCCESS)
        },
    }
}

fn resolve_settings(path: Option<&Path>) -> Result<Settings> {
    let loaded = load_settings(path)?;
    let source = loaded.source.display();
    match loaded.status {
        SettingsLoadStatus::Loaded => {
            log::debug!("settings loaded from {source}");
        },
        SettingsLoadStatus::Missing => {
            log::debug!("no settings at {source}, using defaults");
        },
        SettingsLoadStatus::Invalid(reason) => {
            log::warn!(
                "settings at {source} are invalid, using defaults: {reason}"
            );
        },
    }
    Ok(loaded.settings)
}

fn check(
    settings: &Settings,
    files: &[PathBuf],
    strict: bool,
    deny_warnings: bool,
    format: Format,
) -> Result<ExitCode> {
    let mut options = settings.validator_options();
    options.strict |= strict;
    let deny_warnings = deny_warnings || settings.validator.deny_warnings;

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let input = read_file(file)?;
        results.push((file, validate_json(&input, &options)));
    }

    let failed =
        any_failed(results.iter().map(|(_, result)| result), deny_warnings);

    match format {
        Format::Text => {
            for (file, result) in &results {
                if result.is_clean() {
                    println!("{}: ok", file.display());
                    continue;
                }
                for finding in &result.errors {
                    println!("{}: {finding}", file.display());
                }
            }
        },
        Format::Json => {
            let reports: Vec<FileReport<'_>> = results
                .iter()
                .map(|(file, result)| FileReport {
                    file: file.display().to_string(),
                    result,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        },
    }

    Ok(exit_code(failed))
}

/// A file fails on any error, or on any warning under `deny_warnings`.
fn any_failed<'a>(
    results: impl IntoIterator<Item = &'a ValidationResult>,
    deny_warnings: bool,
) -> bool {
    results.into_iter().any(|result| {
        !result.is_valid() || (deny_warnings && !result.is_clean())
    })
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn outline(file: &Path) -> Result<ExitCode> {
    let payload = read_payload(file)?;

    for row in flatten(payload.root()) {
        let indent = "  ".repeat(row.depth);
        match row.node.text_value() {
            Some(text) => println!("{indent}{} {text:?}", row.id),
            None => println!("{indent}{}", row.id),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn invoke(
    settings: &Settings,
    file: &Path,
    behaviors: &[String],
) -> Result<ExitCode> {
    let document = read_payload(file)?.into_document();
    let binder = DocumentBinder::new()
        .with_options(settings.dispatcher_options())
        .with_sink(Rc::new(StderrSink));

    let mut stdout = io::stdout().lock();
    let missing = invoke_behaviors(&binder, &document, behaviors, &mut stdout)?;

    if !missing.is_empty() {
        log::error!("unknown behaviors: {}", missing.join(", "));
    }
    Ok(exit_code(!missing.is_empty()))
}

/// Invoke `behaviors` left to right, write the final state as JSON to `out`
/// and return the names that matched no behavior.
fn invoke_behaviors<'a>(
    binder: &DocumentBinder,
    document: &Document,
    behaviors: &'a [String],
    out: &mut impl Write,
) -> Result<Vec<&'a str>> {
    let binding = binder.bind(document);

    let mut missing = Vec::new();
    for name in behaviors {
        if !binding.invoke(name) {
            missing.push(name.as_str());
        }
    }

    let snapshot = serde_json::Value::Object(binding.states().snapshot());
    serde_json::to_writer_pretty(&mut *out, &snapshot)?;
    writeln!(out)?;
    Ok(missing)
}

fn read_file(file: &Path) -> Result<String> {
    fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))
}

fn read_payload(file: &Path) -> Result<Payload> {
    let input = read_file(file)?;
    Payload::from_json(&input).map_err(|err| {
        anyhow!("{}: {}", file.display(), err.to_finding())
    })
}
