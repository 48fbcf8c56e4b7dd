//! `crm` - A flat-file customer record manager
//!
//! This library provides the customer record type, a store that keeps the
//! records in memory and mirrors them to a CSV file, and the interactive menu
//! that drives the store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod customer;
pub mod error;
pub mod logging;
pub mod store;

pub use config::Config;
pub use customer::{Customer, CustomerUpdate};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use store::{CustomerStore, LoadStatus};
