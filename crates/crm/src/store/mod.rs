//! Record store for crm.
//!
//! This module keeps the customer list in memory and mirrors it to a
//! comma-separated data file, rewriting the whole file after every change.

pub mod schema;

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::customer::{Customer, CustomerUpdate};
use crate::error::{Error, Result};

/// Outcome of loading the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The data file existed and this many records were read from it.
    Loaded(usize),
    /// No data file was found; the store starts out empty.
    Fresh,
}

/// In-memory customer list backed by a data file.
///
/// Records keep the order they were added in (or the order of the file, after
/// a load). Lookups by email are linear scans that stop at the first
/// case-insensitive match, so duplicate emails are allowed but only the first
/// one is ever updated or deleted.
#[derive(Debug)]
pub struct CustomerStore {
    /// Path to the data file.
    path: PathBuf,
    /// Customers in store order.
    customers: Vec<Customer>,
}

impl CustomerStore {
    /// Create an empty store that persists to `path`.
    ///
    /// Nothing is read or written until [`load`](Self::load) or a mutation.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            customers: Vec::new(),
        }
    }

    /// Create a store and load it from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, LoadStatus)> {
        let mut store = Self::new(path);
        let status = store.load()?;
        Ok((store, status))
    }

    /// Get the path to the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory records with the contents of the data file.
    ///
    /// A missing file is not an error: the store is emptied and
    /// [`LoadStatus::Fresh`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file exists but cannot be read or parsed.
    pub fn load(&mut self) -> Result<LoadStatus> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No data file at {}", self.path.display());
                self.customers.clear();
                return Ok(LoadStatus::Fresh);
            }
            Err(err) => return Err(Error::store_read(&self.path, err.into())),
        };

        let customers = read_customers(&self.path, file)?;

        debug!(
            "Loaded {} customers from {}",
            customers.len(),
            self.path.display()
        );
        self.customers = customers;
        Ok(LoadStatus::Loaded(self.customers.len()))
    }

    /// Overwrite the data file with the current records.
    ///
    /// Writes the header row followed by one row per record in store order.
    /// Parent directories are created if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let write_err = |source| Error::store_write(&self.path, source);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(write_err)?;

        writer.write_record(schema::COLUMNS).map_err(write_err)?;
        for customer in &self.customers {
            writer.serialize(customer).map_err(write_err)?;
        }
        writer
            .flush()
            .map_err(|err| Error::store_write(&self.path, err.into()))?;

        debug!(
            "Saved {} customers to {}",
            self.customers.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Append a customer and persist the store.
    ///
    /// No uniqueness check is made on the email.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be written.
    pub fn add(&mut self, customer: Customer) -> Result<&Customer> {
        if self.position(&customer.email).is_some() {
            warn!("Adding a second customer with email {}", customer.email);
        }
        self.customers.push(customer);
        self.save()?;

        let index = self.customers.len() - 1;
        Ok(&self.customers[index])
    }

    /// All customers in store order.
    #[must_use]
    pub fn list(&self) -> &[Customer] {
        &self.customers
    }

    /// Customers whose name or email contains `term`, ignoring case.
    ///
    /// An empty term matches every customer.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Customer> {
        let term = term.to_lowercase();
        let found: Vec<&Customer> = self
            .customers
            .iter()
            .filter(|c| c.matches_lowercase(&term))
            .collect();
        debug!("Search for {:?} matched {} customers", term, found.len());
        found
    }

    /// Apply `update` to the first customer whose email matches.
    ///
    /// Returns the updated customer, or `None` if no email matched, in which
    /// case nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be written.
    pub fn update(&mut self, email: &str, update: &CustomerUpdate) -> Result<Option<&Customer>> {
        let Some(index) = self.position(email) else {
            debug!("Update found no customer with email {}", email);
            return Ok(None);
        };

        if update.is_empty() {
            debug!("Update for {} carries no new values", email);
        }
        let changed = self.customers[index].apply(update);
        debug!("Updated customer {} (changed: {})", email, changed);
        self.save()?;
        Ok(Some(&self.customers[index]))
    }

    /// Remove the first customer whose email matches.
    ///
    /// Returns the removed customer, or `None` if no email matched, in which
    /// case nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be written.
    pub fn delete(&mut self, email: &str) -> Result<Option<Customer>> {
        let Some(index) = self.position(email) else {
            debug!("Delete found no customer with email {}", email);
            return Ok(None);
        };

        let removed = self.customers.remove(index);
        self.save()?;
        Ok(Some(removed))
    }

    /// Number of customers in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Check if the store has no customers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    fn position(&self, email: &str) -> Option<usize> {
        self.customers.iter().position(|c| c.has_email(email))
    }
}

/// Read every row, matching columns to fields by header name.
///
/// The header must name every column in [`schema::COLUMNS`], spelled exactly.
/// Rows shorter than the header are padded with empty fields. A zero-byte
/// file holds no customers.
fn read_customers(path: &Path, file: File) -> Result<Vec<Customer>> {
    let read_err = |source| Error::store_read(path, source);
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader.headers().map_err(read_err)?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let missing: Vec<&str> = schema::COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            path: path.to_path_buf(),
            columns: missing.join(", "),
        });
    }

    let mut customers: Vec<Customer> = Vec::new();
    for row in reader.records() {
        let mut row = row.map_err(read_err)?;
        while row.len() < headers.len() {
            row.push_field("");
        }
        customers.push(row.deserialize(Some(&headers)).map_err(read_err)?);
    }
    Ok(customers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> (tempfile::TempDir, CustomerStore) {
        crate::logging::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let store = CustomerStore::new(dir.path().join("customers.csv"));
        (dir, store)
    }

    fn alice() -> Customer {
        Customer::new("Alice", "a@x.com", "111", "Addr1")
    }

    fn bob() -> Customer {
        Customer::new("Bob Stone", "bob@example.org", "222", "Addr2")
    }

    #[test]
    fn test_load_missing_file_is_fresh() {
        let (_dir, mut store) = create_test_store();
        assert_eq!(store.load().unwrap(), LoadStatus::Fresh);
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_open_existing_file() {
        let (dir, mut store) = create_test_store();
        store.add(alice()).unwrap();
        store.add(bob()).unwrap();

        let (reopened, status) = CustomerStore::open(dir.path().join("customers.csv")).unwrap();
        assert_eq!(status, LoadStatus::Loaded(2));
        assert_eq!(reopened.list(), &[alice(), bob()]);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, mut store) = create_test_store();
        let tricky = Customer::new(
            "O'Brien, Pat",
            "pat@x.com",
            "",
            "1 \"Main\" St\nSuite 2",
        );
        store.add(alice()).unwrap();
        store.add(tricky.clone()).unwrap();
        store.add(bob()).unwrap();

        let mut reloaded = CustomerStore::new(store.path());
        assert_eq!(reloaded.load().unwrap(), LoadStatus::Loaded(3));
        assert_eq!(reloaded.list(), &[alice(), tricky, bob()]);
    }

    #[test]
    fn test_save_writes_header() {
        let (_dir, store) = create_test_store();
        store.save().unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "name,email,phone,address\n");
    }

    #[test]
    fn test_save_writes_rows_in_order() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();
        store.add(bob()).unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "name,email,phone,address",
                "Alice,a@x.com,111,Addr1",
                "Bob Stone,bob@example.org,222,Addr2",
            ]
        );
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/customers.csv");
        let mut store = CustomerStore::new(&path);

        store.add(alice()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_reads_by_header_name() {
        let (_dir, mut store) = create_test_store();
        std::fs::write(
            store.path(),
            "email,name,address,phone,notes\nc@x.com,Carol,Addr3,333,vip\n",
        )
        .unwrap();

        store.load().unwrap();
        assert_eq!(
            store.list(),
            &[Customer::new("Carol", "c@x.com", "333", "Addr3")]
        );
    }

    #[test]
    fn test_load_short_row_leaves_fields_blank() {
        let (_dir, mut store) = create_test_store();
        std::fs::write(store.path(), "name,email,phone,address\nDan,d@x.com\n").unwrap();

        store.load().unwrap();
        assert_eq!(store.list(), &[Customer::new("Dan", "d@x.com", "", "")]);
    }

    #[test]
    fn test_load_empty_file() {
        let (_dir, mut store) = create_test_store();
        std::fs::write(store.path(), "").unwrap();

        assert_eq!(store.load().unwrap(), LoadStatus::Loaded(0));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_unreadable_path_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CustomerStore::new(dir.path());

        let err = store.load().unwrap_err();
        assert!(err.is_store_error());
    }

    fn assert_rejected_unchanged(contents: &str) -> Error {
        let (_dir, mut store) = create_test_store();
        std::fs::write(store.path(), contents).unwrap();

        let err = store.load().unwrap_err();
        assert!(err.is_store_error(), "unexpected error: {err}");
        assert!(store.is_empty());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), contents);
        err
    }

    #[test]
    fn test_load_wrong_case_header_is_store_error() {
        let err =
            assert_rejected_unchanged("Name,Email,Phone,Address\nAlice,a@x.com,111,Addr1\n");
        assert!(matches!(err, Error::MissingColumns { .. }));
        assert!(err.to_string().contains("name, email, phone, address"));
    }

    #[test]
    fn test_load_headerless_file_is_store_error() {
        assert_rejected_unchanged("Alice,a@x.com,111,Addr1\nBob,b@x.com,222,Addr2\n");
    }

    #[test]
    fn test_load_missing_one_column_is_store_error() {
        let err = assert_rejected_unchanged("name,email,address\nAlice,a@x.com,Addr1\n");
        match err {
            Error::MissingColumns { columns, .. } => assert_eq!(columns, "phone"),
            other => panic!("expected MissingColumns, got {other}"),
        }
    }

    #[test]
    fn test_load_wrong_header_without_rows_is_store_error() {
        assert_rejected_unchanged("Name,Email,Phone,Address\n");
    }

    #[test]
    fn test_open_wrong_header_keeps_existing_store_contents() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();
        std::fs::write(store.path(), "NAME,EMAIL,PHONE,ADDRESS\nBob,b@x.com,2,A2\n").unwrap();

        assert!(store.load().is_err());
        assert!(CustomerStore::open(store.path()).is_err());
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "NAME,EMAIL,PHONE,ADDRESS\nBob,b@x.com,2,A2\n"
        );
    }

    #[test]
    fn test_add_increments_count_and_is_listed() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();
        let before = store.len();

        let added = store.add(bob()).unwrap().clone();
        assert_eq!(added, bob());
        assert_eq!(store.len(), before + 1);
        assert_eq!(store.list().last(), Some(&bob()));
        assert_eq!(store.search("stone"), vec![&bob()]);
    }

    #[test]
    fn test_add_allows_duplicate_email() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();
        store
            .add(Customer::new("Alicia", "A@X.com", "999", "Elsewhere"))
            .unwrap();

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_empty() {
        let (_dir, store) = create_test_store();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_search_case_insensitive_name_or_email() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();
        store.add(bob()).unwrap();

        assert_eq!(store.search("ALI"), vec![&alice()]);
        assert_eq!(store.search("EXAMPLE.ORG"), vec![&bob()]);
        assert_eq!(store.search("@"), vec![&alice(), &bob()]);
    }

    #[test]
    fn test_search_ignores_phone_and_address() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();

        assert!(store.search("111").is_empty());
        assert!(store.search("addr").is_empty());
    }

    #[test]
    fn test_search_no_matches() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();

        assert!(store.search("zzz").is_empty());
    }

    #[test]
    fn test_search_empty_term_matches_all() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();
        store.add(bob()).unwrap();

        assert_eq!(store.search("").len(), 2);
    }

    #[test]
    fn test_update_single_field() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();

        let updated = store
            .update("A@X.COM", &CustomerUpdate::default().phone("222"))
            .unwrap()
            .cloned();

        let expected = Customer::new("Alice", "a@x.com", "222", "Addr1");
        assert_eq!(updated, Some(expected.clone()));

        let (reloaded, _) = CustomerStore::open(store.path()).unwrap();
        assert_eq!(reloaded.list(), &[expected]);
    }

    #[test]
    fn test_update_only_first_match() {
        let (_dir, mut store) = create_test_store();
        let twin = Customer::new("Alice Two", "a@x.com", "999", "Addr9");
        store.add(alice()).unwrap();
        store.add(twin.clone()).unwrap();

        store
            .update("a@x.com", &CustomerUpdate::default().name("Alice One"))
            .unwrap();

        assert_eq!(store.list()[0].name, "Alice One");
        assert_eq!(store.list()[1], twin);
    }

    #[test]
    fn test_update_unmatched_email_leaves_store_untouched() {
        let (_dir, mut store) = create_test_store();

        let result = store
            .update("nobody@x.com", &CustomerUpdate::default().name("Ghost"))
            .unwrap();

        assert!(result.is_none());
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_with_blank_fields_still_matches() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();

        let updated = store
            .update("a@x.com", &CustomerUpdate::default())
            .unwrap()
            .cloned();
        assert_eq!(updated, Some(alice()));
    }

    #[test]
    fn test_delete_first_match_only() {
        let (_dir, mut store) = create_test_store();
        let twin = Customer::new("Alice Two", "A@x.com", "999", "Addr9");
        store.add(alice()).unwrap();
        store.add(bob()).unwrap();
        store.add(twin.clone()).unwrap();

        let removed = store.delete("a@X.com").unwrap();
        assert_eq!(removed, Some(alice()));
        assert_eq!(store.list(), &[bob(), twin.clone()]);

        let (reloaded, _) = CustomerStore::open(store.path()).unwrap();
        assert_eq!(reloaded.list(), &[bob(), twin]);
    }

    #[test]
    fn test_delete_unmatched_email_leaves_store_untouched() {
        let (_dir, mut store) = create_test_store();
        store.add(alice()).unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        assert!(store.delete("bob@example.org").unwrap().is_none());
        assert_eq!(store.list(), &[alice()]);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_path() {
        let store = CustomerStore::new("/tmp/some/customers.csv");
        assert_eq!(store.path(), Path::new("/tmp/some/customers.csv"));
        assert_eq!(store.len(), 0);
    }
}
