//! Invoice persistence: the flat row shape and its stores.

mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{SecondsFormat, Utc};

use crate::error::StoreError;
use crate::models::invoice::InvoiceRecord;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// One table row: the record with its parties expanded into prefixed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRow {
    pub vendor_name: Option<String>,
    pub vendor_address: Option<String>,
    pub vendor_email: Option<String>,
    pub vendor_phone: Option<String>,
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub invoice_number: Option<String>,
    pub date: Option<String>,
    pub total_amount: Option<f64>,
    pub tax: Option<f64>,
    pub payment_terms: Option<i64>,
    /// Document the record was extracted from.
    pub source_file: Option<String>,
    /// RFC 3339 time of extraction.
    pub extracted_at: String,
}

impl InvoiceRow {
    /// Flatten a record. Fields the active schema did not declare become NULL.
    pub fn from_record(record: &InvoiceRecord, source_file: Option<&str>) -> Self {
        Self {
            vendor_name: Some(record.vendor.name.clone()),
            vendor_address: Some(record.vendor.address.clone()),
            vendor_email: Some(record.vendor.email.clone()),
            vendor_phone: record.vendor.phone.clone(),
            customer_name: Some(record.customer.name.clone()),
            customer_address: Some(record.customer.address.clone()),
            customer_email: Some(record.customer.email.clone()),
            customer_phone: record.customer.phone.clone(),
            invoice_number: Some(record.invoice_number.clone()),
            date: Some(record.date.clone()),
            total_amount: Some(record.total_amount),
            tax: Some(record.tax),
            payment_terms: record.payment_terms,
            source_file: source_file.map(str::to_string),
            extracted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Destination for extracted invoices.
pub trait InvoiceStore {
    /// Insert one row, returning its id. Rows are stored as given.
    fn insert(&self, row: &InvoiceRow) -> Result<i64>;
}

impl<S: InvoiceStore + ?Sized> InvoiceStore for &S {
    fn insert(&self, row: &InvoiceRow) -> Result<i64> {
        (**self).insert(row)
    }
}
