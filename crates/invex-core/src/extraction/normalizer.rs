//! Turns raw model output into a validated invoice record.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::invoice::InvoiceRecord;
use crate::models::schema::SchemaContract;

/// Key under which some models nest the scalar invoice fields.
const WRAPPER_KEY: &str = "invoice";

/// Validates model output against a schema contract.
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    contract: SchemaContract,
}

impl ResponseNormalizer {
    pub fn new(contract: SchemaContract) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &SchemaContract {
        &self.contract
    }

    /// Parse, reconcile nesting, validate and materialize a record.
    ///
    /// Fails with [`ExtractionError::EmptyModelResponse`] for blank input,
    /// [`ExtractionError::MalformedResponse`] when the text is not JSON and
    /// [`ExtractionError::SchemaViolation`] when required fields are missing
    /// or mistyped. Nothing is coerced.
    pub fn normalize(&self, raw: &str) -> Result<InvoiceRecord, ExtractionError> {
        if raw.trim().is_empty() {
            return Err(ExtractionError::EmptyModelResponse(
                "no content in model answer".to_string(),
            ));
        }

        let value = parse(raw)?;
        let flat = flatten(value)?;
        let conformed = self.contract.conform(&flat).map_err(|fields| {
            debug!(?fields, "Model answer violates the invoice schema");
            ExtractionError::SchemaViolation { fields }
        })?;

        serde_json::from_value(conformed).map_err(ExtractionError::MalformedResponse)
    }
}

fn parse(raw: &str) -> Result<Value, ExtractionError> {
    let value: Value = serde_json::from_str(raw).map_err(ExtractionError::MalformedResponse)?;

    // Double-encoded answer: a JSON string whose content is the object.
    if let Value::String(inner) = &value {
        if let Ok(decoded @ Value::Object(_)) = serde_json::from_str::<Value>(inner) {
            debug!("Decoded double-encoded model answer");
            return Ok(decoded);
        }
    }

    Ok(value)
}

/// Merge the wrapped shape `{invoice: {..}, vendor, customer}` into one flat
/// object. Flat objects and non-objects pass through untouched.
pub fn flatten(value: Value) -> Result<Value, ExtractionError> {
    let Value::Object(mut root) = value else {
        return Ok(value);
    };

    let Some(wrapped) = root.remove(WRAPPER_KEY) else {
        return Ok(Value::Object(root));
    };

    let Value::Object(scalars) = wrapped else {
        return Err(ExtractionError::SchemaViolation {
            fields: vec![WRAPPER_KEY.to_string()],
        });
    };

    debug!("Flattening wrapped invoice answer");
    let mut merged: Map<String, Value> = scalars;
    for key in ["vendor", "customer"] {
        if let Some(party) = root.remove(key) {
            merged.insert(key.to_string(), party);
        }
    }

    Ok(Value::Object(merged))
}
