//! Invoice extraction through a schema-constrained language model.

mod invoker;
mod normalizer;
mod prompt;

pub use invoker::{ChatCompletionClient, ModelInvoker};
pub use normalizer::{ResponseNormalizer, flatten};
pub use prompt::{ChatMessage, Prompt};

use std::time::Instant;

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::invoice::InvoiceRecord;
use crate::models::schema::{SchemaContract, SchemaVariant};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Validated invoice record.
    pub record: InvoiceRecord,
    /// Model answer as received.
    pub raw_response: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice extractors.
pub trait InvoiceExtractor {
    /// Extract invoice data from plain text.
    fn extract_from_text(&self, text: &str) -> Result<ExtractionResult>;
}

/// Extracts invoices by prompting a model and validating its answer.
pub struct LlmInvoiceExtractor<M> {
    invoker: M,
    model: String,
    normalizer: ResponseNormalizer,
}

impl<M: ModelInvoker> LlmInvoiceExtractor<M> {
    /// Create an extractor using the basic schema.
    pub fn new(invoker: M, model: impl Into<String>) -> Self {
        Self {
            invoker,
            model: model.into(),
            normalizer: ResponseNormalizer::new(SchemaContract::for_variant(SchemaVariant::Basic)),
        }
    }

    /// Set the schema variant requested from the model.
    pub fn with_schema_variant(mut self, variant: SchemaVariant) -> Self {
        self.normalizer = ResponseNormalizer::new(SchemaContract::for_variant(variant));
        self
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn schema(&self) -> &SchemaContract {
        self.normalizer.contract()
    }
}

impl<M: ModelInvoker> InvoiceExtractor for LlmInvoiceExtractor<M> {
    fn extract_from_text(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        let prompt = Prompt::for_document(text);
        let raw_response = self.invoker.invoke(&self.model, &prompt, self.schema())?;
        let record = self.normalizer.normalize(&raw_response)?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            invoice_number = %record.invoice_number,
            processing_time_ms,
            "Extracted invoice record"
        );

        Ok(ExtractionResult {
            record,
            raw_response,
            processing_time_ms,
        })
    }
}
