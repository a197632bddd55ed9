//! Core library for extracting invoice records from PDF files.
//!
//! This crate provides:
//! - PDF text extraction
//! - Prompting a chat model under a JSON Schema constraint
//! - Validation and nesting reconciliation of the model's answer
//! - Flattening and storing records in SQLite
//! - A sequential batch runner that isolates per-document failures

pub mod batch;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pdf;
pub mod store;

pub use batch::{BatchReport, BatchRunner, DocumentOutcome, discover_documents};
pub use error::{BatchError, ExtractionError, InvexError, PdfError, Result, StoreError};
pub use extraction::{
    ChatCompletionClient, ExtractionResult, InvoiceExtractor, LlmInvoiceExtractor, ModelInvoker,
    Prompt, ResponseNormalizer,
};
pub use models::config::InvexConfig;
pub use models::invoice::{InvoiceRecord, Party};
pub use models::schema::{SchemaContract, SchemaVariant};
pub use pdf::{ContentSource, PdfContentSource, PdfExtractor, PdfProcessor};
pub use store::{InvoiceRow, InvoiceStore, SqliteStore};
