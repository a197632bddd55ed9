//! Batch processing: document discovery and the per-document pipeline.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::BatchError;
use crate::extraction::InvoiceExtractor;
use crate::models::invoice::InvoiceRecord;
use crate::pdf::ContentSource;
use crate::store::{InvoiceRow, InvoiceStore};

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Resolve the input path to the list of documents to process.
///
/// A file must have a `.pdf` extension. A directory contributes its
/// immediate `.pdf` children, sorted by name; subdirectories are not
/// searched.
pub fn discover_documents(path: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !path.exists() {
        return Err(BatchError::PathNotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return if is_pdf(path) {
            Ok(vec![path.to_path_buf()])
        } else {
            Err(BatchError::UnsupportedFile(path.to_path_buf()))
        };
    }

    let mut documents = Vec::new();
    if path.is_dir() {
        let dir = path
            .to_str()
            .ok_or_else(|| BatchError::Pattern(format!("non UTF-8 path: {}", path.display())))?;
        let pattern = Path::new(&glob::Pattern::escape(dir)).join("*");
        let pattern = pattern.to_string_lossy();

        documents = glob::glob(&pattern)
            .map_err(|e| BatchError::Pattern(e.to_string()))?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file() && is_pdf(p))
            .collect();
        documents.sort();
    }

    if documents.is_empty() {
        return Err(BatchError::NoMatchingDocuments(path.to_path_buf()));
    }

    debug!("Found {} documents under {}", documents.len(), path.display());
    Ok(documents)
}

/// A document whose record was stored.
#[derive(Debug)]
pub struct StoredDocument {
    pub path: PathBuf,
    /// Row id assigned by the store.
    pub id: i64,
    pub record: InvoiceRecord,
}

/// A document that could not be processed.
#[derive(Debug)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: crate::InvexError,
}

/// What happened to one document.
#[derive(Debug)]
pub enum DocumentOutcome {
    Stored(StoredDocument),
    Failed(DocumentFailure),
}

/// Outcome of a whole batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub stored: Vec<StoredDocument>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    /// Number of documents seen.
    pub fn total(&self) -> usize {
        self.stored.len() + self.failures.len()
    }
}

/// Drives documents through text extraction, the model and the store.
///
/// Documents are handled one at a time in the given order. A failing
/// document is reported and skipped; nothing is retried.
pub struct BatchRunner<C, E, S> {
    source: C,
    extractor: E,
    store: S,
}

impl<C, E, S> BatchRunner<C, E, S>
where
    C: ContentSource,
    E: InvoiceExtractor,
    S: InvoiceStore,
{
    pub fn new(source: C, extractor: E, store: S) -> Self {
        Self {
            source,
            extractor,
            store,
        }
    }

    /// Run one document through the whole pipeline.
    pub fn process_document(&self, path: &Path) -> crate::Result<StoredDocument> {
        let text = self.source.read_text(path)?;
        let result = self.extractor.extract_from_text(&text)?;

        let source_file = path.display().to_string();
        let row = InvoiceRow::from_record(&result.record, Some(&source_file));
        let id = self.store.insert(&row)?;

        Ok(StoredDocument {
            path: path.to_path_buf(),
            id,
            record: result.record,
        })
    }

    /// Process every document, calling `observer` after each one.
    pub fn run<F>(&self, documents: &[PathBuf], mut observer: F) -> BatchReport
    where
        F: FnMut(&DocumentOutcome),
    {
        let mut report = BatchReport::default();

        for path in documents {
            info!("Processing {}", path.display());

            let outcome = match self.process_document(path) {
                Ok(stored) => DocumentOutcome::Stored(stored),
                Err(error) => {
                    warn!(document = %path.display(), error = %error, "Failed to process document");
                    DocumentOutcome::Failed(DocumentFailure {
                        path: path.clone(),
                        error,
                    })
                }
            };

            observer(&outcome);
            match outcome {
                DocumentOutcome::Stored(stored) => report.stored.push(stored),
                DocumentOutcome::Failed(failure) => report.failures.push(failure),
            }
        }

        info!(
            "Batch finished: {} stored, {} failed",
            report.stored.len(),
            report.failures.len()
        );
        report
    }
}
