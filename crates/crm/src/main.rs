//! `crm` - interactive customer record manager
//!
//! Loads the customer data file and runs the menu loop on stdin/stdout.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crm::cli::{Cli, Dispatcher};
use crm::{init_logging, Config, CustomerStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let data_file = cli.file.clone().unwrap_or_else(|| config.data_file());

    let (mut store, status) = CustomerStore::open(&data_file)
        .with_context(|| format!("opening customer data {}", data_file.display()))?;
    info!("Using customer data at {} ({:?})", data_file.display(), status);

    let stdin = io::stdin();
    let mut dispatcher = Dispatcher::new(&mut store, stdin.lock(), io::stdout().lock());
    dispatcher.announce(status)?;
    dispatcher.run()?;
    Ok(())
}
