//! Command-line interface for crm.
//!
//! This module provides the argument parser for the `crm` binary and the
//! interactive menu loop it runs.

mod dispatcher;

use std::path::PathBuf;

use clap::Parser;

pub use dispatcher::{Dispatcher, InvalidChoice, MenuChoice};

use crate::logging::Verbosity;

/// crm - Keep track of your customers
///
/// An interactive menu for adding, viewing, searching, updating and deleting
/// customer records kept in a CSV file.
#[derive(Debug, Parser)]
#[command(name = "crm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Customer data file (overrides the configured path)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                2 => Verbosity::Debug,
                _ => Verbosity::Trace,
            }
        }
    }
}
