//! Interactive menu loop.
//!
//! The dispatcher shows the numbered menu, reads a choice, prompts for the
//! fields that choice needs, calls into the [`CustomerStore`] and prints the
//! outcome. It reads from any [`BufRead`] and writes to any [`Write`], so the
//! binary hands it stdin and stdout while tests hand it byte buffers.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, trace};

use crate::customer::{Customer, CustomerUpdate};
use crate::error::Result;
use crate::store::{CustomerStore, LoadStatus};

const MENU: &str = "\
Customer Relationship Management System
1. Add Customer
2. View All Customers
3. Search Customer
4. Update Customer
5. Delete Customer
6. Exit";

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Add a new customer.
    Add,
    /// List every customer.
    View,
    /// Search customers by name or email.
    Search,
    /// Update a customer found by email.
    Update,
    /// Delete a customer found by email.
    Delete,
    /// Leave the menu loop.
    Exit,
}

/// The input line did not name a menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid menu choice: {0:?}")]
pub struct InvalidChoice(pub String);

impl FromStr for MenuChoice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Add),
            "2" => Ok(Self::View),
            "3" => Ok(Self::Search),
            "4" => Ok(Self::Update),
            "5" => Ok(Self::Delete),
            "6" => Ok(Self::Exit),
            other => Err(InvalidChoice(other.to_string())),
        }
    }
}

/// Read-eval-print loop over a customer store.
#[derive(Debug)]
pub struct Dispatcher<'a, R, W> {
    store: &'a mut CustomerStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Dispatcher<'a, R, W> {
    /// Create a dispatcher reading answers from `input` and printing to `output`.
    pub fn new(store: &'a mut CustomerStore, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Tell the user how the data file was loaded.
    ///
    /// Only a fresh start is worth mentioning.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn announce(&mut self, status: LoadStatus) -> Result<()> {
        if status == LoadStatus::Fresh {
            writeln!(self.output, "No customer data found, starting fresh.")?;
        }
        Ok(())
    }

    /// Run the menu loop until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the console cannot be read or written, or if the
    /// data file cannot be saved after a change.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(line) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(err) => {
                    debug!("{err}");
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    continue;
                }
            };

            trace!("Menu choice {:?}", choice);
            if self.dispatch(choice)?.is_break() {
                break;
            }
        }

        writeln!(self.output, "Exiting CRM system.")?;
        self.output.flush()?;
        Ok(())
    }

    /// Carry out one menu choice. Breaks on exit or end of input.
    fn dispatch(&mut self, choice: MenuChoice) -> Result<ControlFlow<()>> {
        match choice {
            MenuChoice::Add => self.add(),
            MenuChoice::View => self.view().map(ControlFlow::Continue),
            MenuChoice::Search => self.search(),
            MenuChoice::Update => self.update(),
            MenuChoice::Delete => self.delete(),
            MenuChoice::Exit => Ok(ControlFlow::Break(())),
        }
    }

    fn add(&mut self) -> Result<ControlFlow<()>> {
        let Some(name) = self.prompt("Enter Name: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(email) = self.prompt("Enter Email: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(phone) = self.prompt("Enter Phone Number: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(address) = self.prompt("Enter Address: ")? else {
            return Ok(ControlFlow::Break(()));
        };

        let added = self
            .store
            .add(Customer::new(name, email, phone, address))?;
        writeln!(self.output, "Customer {} added successfully.", added.name)?;
        Ok(ControlFlow::Continue(()))
    }

    fn view(&mut self) -> Result<()> {
        let customers = self.store.list();
        if customers.is_empty() {
            writeln!(self.output, "No customers found.")?;
            return Ok(());
        }

        writeln!(self.output, "\nCustomer List:")?;
        for customer in customers {
            writeln!(self.output, "{customer}")?;
        }
        Ok(())
    }

    fn search(&mut self) -> Result<ControlFlow<()>> {
        let Some(term) = self.prompt("Enter name or email to search: ")? else {
            return Ok(ControlFlow::Break(()));
        };

        let found = self.store.search(&term);
        if found.is_empty() {
            writeln!(
                self.output,
                "No customer found for search term '{term}'."
            )?;
        }
        for customer in found {
            writeln!(self.output, "Found: {customer}")?;
        }
        Ok(ControlFlow::Continue(()))
    }

    fn update(&mut self) -> Result<ControlFlow<()>> {
        let Some(email) = self.prompt("Enter email of the customer to update: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(name) = self.prompt("Enter new Name (leave blank to keep unchanged): ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(phone) = self.prompt("Enter new Phone (leave blank to keep unchanged): ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(address) =
            self.prompt("Enter new Address (leave blank to keep unchanged): ")?
        else {
            return Ok(ControlFlow::Break(()));
        };

        let update = CustomerUpdate::from_answers(name, phone, address);
        match self.store.update(&email, &update)? {
            Some(customer) => {
                writeln!(self.output, "Customer {} updated successfully.", customer.name)?;
            }
            None => writeln!(self.output, "No customer found with email {email}.")?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn delete(&mut self) -> Result<ControlFlow<()>> {
        let Some(email) = self.prompt("Enter email of the customer to delete: ")? else {
            return Ok(ControlFlow::Break(()));
        };

        match self.store.delete(&email)? {
            Some(customer) => {
                writeln!(self.output, "Customer {} deleted successfully.", customer.name)?;
            }
            None => writeln!(self.output, "No customer found with email {email}.")?,
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Print `label` and read one line, without its line terminator.
    ///
    /// Returns `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
