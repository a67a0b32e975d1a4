//! The propwrap Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use crate::cli::args::{Command, PropwrapArgs, Sources};
use crate::config::{self, Format};
use crate::errors::ConfigError;
use crate::schema::Schema;
use crate::value::Value;
use crate::wrapper::Wrapped;
use clap::Parser;
use log::{debug, warn, LevelFilter};
use miette::{miette, IntoDiagnostic, Result};
use std::path::Path;
use std::sync::Arc;
use std::{fs, io, process};
use termcolor::{ColorChoice, StandardStream};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = PropwrapArgs::parse();
    init_logging(args.verbose);

    if let Err(report) = dispatch(args.command) {
        eprintln!("{:?}", report);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Get { sources, name } => handle_get(&sources, &name),
        Command::Set {
            sources,
            name,
            value,
            in_place,
        } => handle_set(&sources, &name, &value, in_place),
        Command::Delete {
            sources,
            name,
            in_place,
        } => handle_delete(&sources, &name, in_place),
        Command::List { props } => handle_list(&props),
        Command::Check { sources } => handle_check(&sources),
    }
}

fn load_schema(props: &Path) -> Result<Arc<Schema<Value>>> {
    let type_name = props
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("properties");
    Ok(config::load_table(props)?.build(type_name)?)
}

fn load_wrapped(sources: &Sources) -> Result<Wrapped<Value>> {
    let schema = load_schema(&sources.props)?;
    let contents = config::load_document(&sources.data)?;
    debug!(
        "wrapping {} with {} properties",
        sources.data.display(),
        schema.len()
    );
    Ok(schema.wrap(contents))
}

/// Parses a command-line value as JSON, falling back to a plain string.
fn parse_value(text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => {
            debug!("treating {:?} as a string value", text);
            Value::from(text)
        }
    }
}

fn emit(sources: &Sources, wrapped: &Wrapped<Value>, in_place: bool) -> Result<()> {
    if in_place {
        let format = Format::from_path(&sources.data)?;
        let text = config::render_document(wrapped, format)?;
        fs::write(&sources.data, text)
            .map_err(|source| ConfigError::Io {
                path: sources.data.clone(),
                source,
            })?;
        debug!("wrote {}", sources.data.display());
        Ok(())
    } else {
        output::print_value(&mut io::stdout().lock(), wrapped).into_diagnostic()
    }
}

/// Handles the `get` subcommand.
fn handle_get(sources: &Sources, name: &str) -> Result<()> {
    let wrapped = load_wrapped(sources)?;
    let value = wrapped.get(name)?;
    output::print_value(&mut io::stdout().lock(), &value).into_diagnostic()
}

/// Handles the `set` subcommand.
fn handle_set(sources: &Sources, name: &str, value: &str, in_place: bool) -> Result<()> {
    let mut wrapped = load_wrapped(sources)?;
    wrapped.set(name, parse_value(value))?;
    emit(sources, &wrapped, in_place)
}

/// Handles the `delete` subcommand.
fn handle_delete(sources: &Sources, name: &str, in_place: bool) -> Result<()> {
    let mut wrapped = load_wrapped(sources)?;
    wrapped.delete(name)?;
    emit(sources, &wrapped, in_place)
}

/// Handles the `list` subcommand.
fn handle_list(props: &Path) -> Result<()> {
    let schema = load_schema(props)?;
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    output::print_listing(&mut stdout, &schema).into_diagnostic()
}

/// Handles the `check` subcommand.
fn handle_check(sources: &Sources) -> Result<()> {
    let wrapped = load_wrapped(sources)?;
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let missing = output::print_check(&mut stdout, wrapped.schema(), &wrapped).into_diagnostic()?;
    if missing.is_empty() {
        return Ok(());
    }
    for name in &missing {
        warn!("property '{}' does not resolve in {}", name, sources.data.display());
    }
    Err(miette!(
        "{} of {} properties do not resolve",
        missing.len(),
        wrapped.schema().len()
    ))
}
