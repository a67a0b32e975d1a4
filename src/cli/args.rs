//! Defines the command-line arguments and subcommands for the propwrap CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "propwrap",
    version,
    about = "Read and edit nested JSON/YAML documents through named properties."
)]
pub struct PropwrapArgs {
    /// Raise log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// The property table and data document a command works on.
#[derive(Debug, Args)]
pub struct Sources {
    /// Property table (.yaml, .yml or .json).
    #[arg(short, long)]
    pub props: PathBuf,

    /// Data document to wrap (.yaml, .yml or .json).
    #[arg(short, long)]
    pub data: PathBuf,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the value of a property as JSON.
    Get {
        #[command(flatten)]
        sources: Sources,
        /// The property to read.
        name: String,
    },
    /// Assign a property and print the updated document.
    Set {
        #[command(flatten)]
        sources: Sources,
        /// The property to write.
        name: String,
        /// The new value as JSON; text that is not valid JSON is taken as a string.
        value: String,
        /// Write the result back to the data file instead of printing it.
        #[arg(long)]
        in_place: bool,
    },
    /// Remove a property and print the updated document.
    Delete {
        #[command(flatten)]
        sources: Sources,
        /// The property to remove.
        name: String,
        /// Write the result back to the data file instead of printing it.
        #[arg(long)]
        in_place: bool,
    },
    /// List the properties declared in a table.
    List {
        /// Property table (.yaml, .yml or .json).
        #[arg(short, long)]
        props: PathBuf,
    },
    /// Report which properties resolve in a document.
    Check {
        #[command(flatten)]
        sources: Sources,
    },
}
