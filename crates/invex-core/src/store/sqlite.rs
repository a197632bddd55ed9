//! SQLite-backed invoice table.

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::debug;

use super::{InvoiceRow, InvoiceStore, Result};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS invoices (
    id INTEGER PRIMARY KEY,
    vendor_name TEXT,
    vendor_address TEXT,
    vendor_email TEXT,
    vendor_phone TEXT,
    customer_name TEXT,
    customer_address TEXT,
    customer_email TEXT,
    customer_phone TEXT,
    invoice_number TEXT,
    date TEXT,
    total_amount REAL,
    tax REAL,
    payment_terms INTEGER,
    source_file TEXT,
    extracted_at TEXT NOT NULL
);
"#;

/// Invoice store on a single SQLite connection.
///
/// Opened once per batch and used sequentially; each insert is its own
/// implicit transaction.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a database file and make sure the table exists.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!("Opened invoice database at {}", path.display());
        Self::with_connection(conn)
    }

    /// In-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Number of stored invoices.
    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Borrow the underlying connection (for callers that need raw SQL).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl InvoiceStore for SqliteStore {
    fn insert(&self, row: &InvoiceRow) -> Result<i64> {
        self.conn.execute(
            r#"INSERT INTO invoices (
                vendor_name, vendor_address, vendor_email, vendor_phone,
                customer_name, customer_address, customer_email, customer_phone,
                invoice_number, "date", total_amount, tax, payment_terms,
                source_file, extracted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"#,
            params![
                row.vendor_name,
                row.vendor_address,
                row.vendor_email,
                row.vendor_phone,
                row.customer_name,
                row.customer_address,
                row.customer_email,
                row.customer_phone,
                row.invoice_number,
                row.date,
                row.total_amount,
                row.tax,
                row.payment_terms,
                row.source_file,
                row.extracted_at,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, invoice_number = ?row.invoice_number, "Stored invoice");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{InvoiceRecord, Party};
    use pretty_assertions::assert_eq;

    fn record() -> InvoiceRecord {
        InvoiceRecord {
            vendor: Party {
                name: "Acme".to_string(),
                address: "1 Rd".to_string(),
                email: "a@x.com".to_string(),
                phone: None,
            },
            customer: Party {
                name: "Bob".to_string(),
                address: "2 Rd".to_string(),
                email: "b@x.com".to_string(),
                phone: None,
            },
            invoice_number: "INV-1".to_string(),
            date: "2024-01-01".to_string(),
            total_amount: 100.0,
            tax: 8.0,
            payment_terms: None,
        }
    }

    #[test]
    fn test_insert_flattened_record() {
        let store = SqliteStore::open_in_memory().unwrap();
        let row = InvoiceRow::from_record(&record(), Some("inv.pdf"));
        store.insert(&row).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let (vendor, customer, total, tax): (String, String, f64, f64) = store
            .conn()
            .query_row(
                "SELECT vendor_name, customer_email, total_amount, tax FROM invoices",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .unwrap();
        assert_eq!(vendor, "Acme");
        assert_eq!(customer, "b@x.com");
        assert_eq!(total, 100.0);
        assert_eq!(tax, 8.0);
    }

    #[test]
    fn test_undeclared_fields_are_null() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&InvoiceRow::from_record(&record(), None)).unwrap();

        let (phone, terms, source): (Option<String>, Option<i64>, Option<String>) = store
            .conn()
            .query_row(
                "SELECT vendor_phone, payment_terms, source_file FROM invoices",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!((phone, terms, source), (None, None, None));
    }

    #[test]
    fn test_rows_are_not_revalidated() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut row = InvoiceRow::from_record(&record(), None);
        row.vendor_name = None;
        row.total_amount = None;

        assert!(store.insert(&row).is_ok());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("invoices.db");

        {
            let store = SqliteStore::open_or_create(&path).unwrap();
            store.insert(&InvoiceRow::from_record(&record(), None)).unwrap();
            store.insert(&InvoiceRow::from_record(&record(), None)).unwrap();
        }

        let store = SqliteStore::open_or_create(&path).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_extended_fields_are_stored() {
        let mut extended = record();
        extended.vendor.phone = Some("555".to_string());
        extended.payment_terms = Some(14);

        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&InvoiceRow::from_record(&extended, None)).unwrap();

        let (phone, terms): (String, i64) = store
            .conn()
            .query_row("SELECT vendor_phone, payment_terms FROM invoices", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(phone, "555");
        assert_eq!(terms, 14);
    }
}
