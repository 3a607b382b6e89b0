//! Raw JSON format implementation
//!
//! The wire form of the Document model itself: `blocks` plus `entityMap`,
//! with camelCase field names. This is the exchange format editors emit,
//! so parsing accepts exactly what [`draftmark_core::Document`] derives
//! and nothing looser. Parsed input is validated before it is returned;
//! a document that deserializes but breaks the model invariants is
//! rejected rather than passed downstream.

use crate::error::FormatError;
use crate::format::Format;
use draftmark_core::Document;
use std::collections::HashMap;

/// Format implementation for the raw JSON wire form.
#[derive(Debug, Clone, Default)]
pub struct RawFormat {
    /// Pretty-print serialized output.
    pub pretty: bool,
}

impl RawFormat {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Format for RawFormat {
    fn name(&self) -> &str {
        "raw"
    }

    fn description(&self) -> &str {
        "Raw JSON wire format (blocks and entityMap)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        let doc: Document = serde_json::from_str(source)
            .map_err(|e| FormatError::ParseError(format!("Invalid JSON document: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        doc.validate()?;
        let json = if self.pretty {
            serde_json::to_string_pretty(doc)
        } else {
            serde_json::to_string(doc)
        };
        json.map_err(|e| FormatError::SerializationError(format!("JSON encoding failed: {e}")))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut format = self.clone();
        for (key, value) in options {
            match key.as_str() {
                "pretty" => {
                    format.pretty = value.parse().map_err(|_| {
                        FormatError::NotSupported(format!(
                            "Invalid value '{value}' for raw option 'pretty'"
                        ))
                    })?;
                }
                other => {
                    return Err(FormatError::NotSupported(format!(
                        "Unknown raw format option '{other}'"
                    )));
                }
            }
        }
        format.serialize(doc)
    }
}
