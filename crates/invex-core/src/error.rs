//! Error types for the invex-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// Batch-level failure; aborts the whole run.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Persistence error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors that stop a batch before any document is processed.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The input path does not exist.
    #[error("the path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    /// The input path is a file, but not a PDF.
    #[error("the file '{}' is not a PDF file", .0.display())]
    UnsupportedFile(PathBuf),

    /// Nothing to process under the input path.
    #[error("no PDF files found in '{}'", .0.display())]
    NoMatchingDocuments(PathBuf),

    /// The directory could not be turned into a search pattern.
    #[error("invalid search pattern: {0}")]
    Pattern(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while turning document text into a validated record.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The model produced nothing usable.
    #[error("model returned an empty response: {0}")]
    EmptyModelResponse(String),

    /// The model output is not valid JSON.
    #[error("invalid JSON response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// Required fields are missing or carry the wrong type.
    #[error("response does not match the invoice schema: {}", .fields.join(", "))]
    SchemaViolation { fields: Vec<String> },
}

impl ExtractionError {
    /// Fields named by a schema violation, empty for other kinds.
    pub fn violated_fields(&self) -> &[String] {
        match self {
            ExtractionError::SchemaViolation { fields } => fields,
            _ => &[],
        }
    }
}

/// Errors related to the invoice store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite reported an error.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database directory could not be created.
    #[error("cannot prepare database location: {0}")]
    Location(#[from] std::io::Error),
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
