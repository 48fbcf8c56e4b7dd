//! Layout of the customer data file.

/// Column names, in the order they are written.
pub const COLUMNS: [&str; 4] = ["name", "email", "phone", "address"];

/// Default data file name, resolved against the working directory.
pub const DEFAULT_FILE_NAME: &str = "customers.csv";
