//! JSON Schema contract for invoice records.
//!
//! The same contract is sent to the model as a structured-output constraint
//! and used afterwards to check what actually came back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Which shape of invoice record is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    /// Parties, number, date, total and tax.
    #[default]
    Basic,
    /// Basic fields plus party phone numbers and payment terms.
    Extended,
}

impl SchemaVariant {
    /// Parse a variant name as used in configuration.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "basic" => Some(SchemaVariant::Basic),
            "extended" => Some(SchemaVariant::Extended),
            _ => None,
        }
    }
}

/// A declared record shape: field names, primitive types and required-ness.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaContract {
    variant: SchemaVariant,
    schema: Value,
}

impl SchemaContract {
    /// Build the contract for a schema variant.
    pub fn for_variant(variant: SchemaVariant) -> Self {
        let extended = variant == SchemaVariant::Extended;
        let party = |description: &str| party_schema(description, extended);

        let mut properties = Map::new();
        properties.insert("vendor".into(), party("Details of the vendor issuing the invoice."));
        properties.insert("customer".into(), party("Details of the customer receiving the invoice."));
        properties.insert(
            "invoiceNumber".into(),
            field("string", "Unique identifier for the invoice."),
        );
        properties.insert("date".into(), field("string", "Date when the invoice was issued."));
        properties.insert(
            "totalAmount".into(),
            field("number", "Total amount due on the invoice."),
        );
        properties.insert(
            "tax".into(),
            field("number", "Total tax amount applied to the invoice."),
        );
        if extended {
            properties.insert(
                "paymentTerms".into(),
                field("integer", "Number of days until payment is due."),
            );
        }

        let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();

        Self {
            variant,
            schema: json!({
                "title": "Invoice",
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            }),
        }
    }

    /// The variant this contract describes.
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Name under which the schema is announced to the model.
    pub fn name(&self) -> &'static str {
        "invoice"
    }

    /// The JSON Schema document.
    pub fn as_json(&self) -> &Value {
        &self.schema
    }

    /// Check a value against the contract.
    ///
    /// Returns a copy holding only the declared properties, or the dotted
    /// paths of every missing or mistyped field. Values are never coerced.
    pub fn conform(&self, value: &Value) -> Result<Value, Vec<String>> {
        let mut violations = Vec::new();
        let conformed = check(&self.schema, value, "", &mut violations);

        match conformed {
            Some(value) if violations.is_empty() => Ok(value),
            _ => {
                if violations.is_empty() {
                    violations.push("$".to_string());
                }
                Err(violations)
            }
        }
    }
}

fn field(kind: &str, description: &str) -> Value {
    json!({ "type": kind, "description": description })
}

fn party_schema(description: &str, with_phone: bool) -> Value {
    let mut properties = Map::new();
    properties.insert("name".into(), field("string", "The name of the company or person."));
    properties.insert("address".into(), field("string", "The postal address."));
    properties.insert("email".into(), field("string", "The email address."));
    if with_phone {
        properties.insert("phone".into(), field("string", "The phone number."));
    }
    let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();

    json!({
        "type": "object",
        "description": description,
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn check(schema: &Value, value: &Value, path: &str, violations: &mut Vec<String>) -> Option<Value> {
    let kind = schema.get("type").and_then(Value::as_str).unwrap_or("object");
    let label = if path.is_empty() { "$" } else { path };

    let matches = match kind {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64(),
        "object" => value.is_object(),
        _ => false,
    };
    if !matches {
        violations.push(label.to_string());
        return None;
    }

    let Some(object) = value.as_object() else {
        return Some(value.clone());
    };

    let empty = Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut conformed = Map::new();
    for (key, property) in properties {
        match object.get(key) {
            Some(child) => {
                if let Some(child) = check(property, child, &child_path(path, key), violations) {
                    conformed.insert(key.clone(), child);
                }
            }
            None if required.contains(&key.as_str()) => {
                violations.push(child_path(path, key));
            }
            None => {}
        }
    }

    Some(Value::Object(conformed))
}
