//! Baro CLI - check form manifests and validate form state.

use baro_core::validation::parse_date;
use baro_core::{AggregateResult, FieldValue, FormError, FormValidationEngine, ValidationReport};
use baro_yaml::{Fixtures, FormManifest, ParseError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "baro")]
#[command(about = "Form validation for the Baro storefront")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check form manifest validity
    Check {
        /// Path to manifest file
        manifest: PathBuf,

        /// Fixture datasets (default: storefront)
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// List the fields of a form
    Fields {
        /// Path to manifest file (default: registration form)
        manifest: Option<PathBuf>,

        /// Fixture datasets (default: storefront)
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Validate a form state file
    Validate {
        /// YAML or JSON mapping of field name to value
        state: PathBuf,

        /// Path to manifest file (default: registration form)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Fixture datasets (default: storefront)
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Evaluation date, YYYY-MM-DD (default: local date)
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Form(#[from] FormError),

    #[error("invalid state file: {0}")]
    State(String),

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput<'a> {
    form: &'a str,
    fields: &'a ValidationReport,
    #[serde(flatten)]
    aggregate: &'a AggregateResult,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "baro=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<ExitCode, CliError> {
    match command {
        Commands::Check { manifest, fixtures } => {
            check_manifest(&manifest, fixtures.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fields { manifest, fixtures } => {
            let (_, engine) = load_form(manifest.as_deref(), fixtures.as_deref())?;
            print!("{}", describe_fields(&engine));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate {
            state,
            manifest,
            fixtures,
            today,
            format,
        } => validate_state(&state, manifest.as_deref(), fixtures.as_deref(), today, format),
    }
}

fn parse_today(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("expected YYYY-MM-DD, got '{s}'"))
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_form(
    manifest: Option<&Path>,
    fixtures: Option<&Path>,
) -> Result<(String, FormValidationEngine), CliError> {
    let fixtures = match fixtures {
        Some(path) => Fixtures::from_yaml(&read(path)?)?,
        None => Fixtures::storefront()?,
    };
    let manifest = match manifest {
        Some(path) => FormManifest::from_yaml(&read(path)?)?,
        None => FormManifest::registration()?,
    };
    let engine = manifest.build_engine(&fixtures)?;
    Ok((manifest.name, engine))
}

fn check_manifest(path: &Path, fixtures: Option<&Path>) -> Result<(), CliError> {
    println!("Checking manifest: {}", path.display());

    let (name, engine) = load_form(Some(path), fixtures)?;
    let required = engine.fields().iter().filter(|f| f.is_required()).count();

    println!("Manifest valid!");
    println!("  Name: {name}");
    println!("  Fields: {}", engine.fields().len());
    println!("  Required: {required}");
    Ok(())
}

fn describe_fields(engine: &FormValidationEngine) -> String {
    let mut out = String::new();
    for field in engine.fields() {
        out.push_str(&format!(
            "{:<12} {:<9} #{:<10} {}\n",
            field.name(),
            field.kind().as_str(),
            field.test_id(),
            field.required_message().unwrap_or("-"),
        ));
        for rule in field.rules() {
            out.push_str(&format!("{:<12} {}: {}\n", "", rule.name(), rule.message()));
        }
        if let Some(max) = field.max_length() {
            out.push_str(&format!("{:<12} max length: {max}\n", ""));
        }
        if !field.options().is_empty() {
            out.push_str(&format!("{:<12} options: {}\n", "", field.options().len()));
        }
    }
    out
}

/// Parse a state document; JSON when `json` is set, YAML otherwise.
///
/// `null` leaves a field unset. Numbers are taken as their text.
fn parse_state(content: &str, json: bool) -> Result<BTreeMap<String, FieldValue>, CliError> {
    let document: serde_json::Value = if json {
        serde_json::from_str(content).map_err(|e| CliError::State(e.to_string()))?
    } else {
        serde_yaml_ng::from_str(content).map_err(|e| CliError::State(e.to_string()))?
    };

    let serde_json::Value::Object(entries) = document else {
        return Err(CliError::State(
            "expected a mapping of field name to value".to_string(),
        ));
    };

    let mut state = BTreeMap::new();
    for (name, value) in entries {
        let value = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::String(s) => FieldValue::Text(s),
            serde_json::Value::Number(n) => FieldValue::Text(n.to_string()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return Err(CliError::State(format!(
                    "'{name}' must be a string or a boolean"
                )));
            }
        };
        state.insert(name, value);
    }
    Ok(state)
}

fn render_text(form: &str, report: &ValidationReport, aggregate: &AggregateResult) -> String {
    let mut out = format!("Form: {form}\n");
    for (name, result) in report.iter() {
        match result.error() {
            None => out.push_str(&format!("  ok    {name}\n")),
            Some(message) => out.push_str(&format!("  FAIL  {name}: {message}\n")),
        }
    }
    out.push_str(&format!("canSubmit: {}\n", aggregate.can_submit));
    out
}

fn validate_state(
    path: &Path,
    manifest: Option<&Path>,
    fixtures: Option<&Path>,
    today: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let (form, mut engine) = load_form(manifest, fixtures)?;
    if let Some(today) = today {
        engine = engine.with_today(today);
    }

    let json = path.extension().is_some_and(|ext| ext == "json");
    let state = parse_state(&read(path)?, json)?;
    tracing::debug!(path = %path.display(), values = state.len(), "state loaded");
    for (name, value) in state {
        engine.set_value(&name, value)?;
    }

    let report = engine.validate_all();
    let aggregate = engine.can_submit();
    match format {
        OutputFormat::Text => print!("{}", render_text(&form, &report, &aggregate)),
        OutputFormat::Json => {
            let output = ValidateOutput {
                form: &form,
                fields: &report,
                aggregate: &aggregate,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    tracing::info!(form = %form, can_submit = aggregate.can_submit, "form validated");
    Ok(if aggregate.can_submit {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
