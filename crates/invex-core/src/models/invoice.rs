//! Invoice record as produced by the extraction pipeline.

use serde::{Deserialize, Serialize};

/// A party (vendor or customer) on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Name of the company or person.
    pub name: String,

    /// Postal address as printed.
    pub address: String,

    /// Email address.
    pub email: String,

    /// Phone number. Only declared by the extended schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A validated invoice record.
///
/// Built once per document by the response normalizer and handed to the
/// store; values are kept exactly as the model emitted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Party issuing the invoice.
    pub vendor: Party,

    /// Party receiving the invoice.
    pub customer: Party,

    /// Invoice number/identifier.
    pub invoice_number: String,

    /// Issue date, free-form text.
    pub date: String,

    /// Total amount due.
    pub total_amount: f64,

    /// Total tax amount.
    pub tax: f64,

    /// Payment terms in days. Only declared by the extended schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<i64>,
}
