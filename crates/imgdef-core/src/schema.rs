//! # Schema Descriptor
//!
//! The externally supplied list of field names that must be present,
//! independent of per-field omit-if-empty markers. Usually taken from the
//! top-level `required` array of a JSON Schema document.

use serde_json::Value;
use thiserror::Error;

use crate::field::FieldDescriptor;

/// A JSON Schema document could not be read as a required-name list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaDescriptorError {
    #[error("schema document must be a JSON object")]
    NotAnObject,

    #[error("schema \"required\" must be an array")]
    RequiredNotArray,

    #[error("schema \"required\" entry {index} is not a string")]
    NonStringEntry { index: usize },
}

/// Ordered, de-duplicated set of required field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDescriptor {
    required: Vec<String>,
}

impl SchemaDescriptor {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut required: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !required.contains(&name) {
                required.push(name);
            }
        }
        Self { required }
    }

    /// Read the top-level `required` array of a JSON Schema document.
    ///
    /// A schema without `required` yields an empty descriptor.
    pub fn from_json_schema(schema: &Value) -> Result<Self, SchemaDescriptorError> {
        let object = schema.as_object().ok_or(SchemaDescriptorError::NotAnObject)?;
        let Some(required) = object.get("required") else {
            return Ok(Self::default());
        };
        let entries = required
            .as_array()
            .ok_or(SchemaDescriptorError::RequiredNotArray)?;

        let names = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .as_str()
                    .ok_or(SchemaDescriptorError::NonStringEntry { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(names))
    }

    /// Whether `name` is listed as required.
    pub fn requires(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }

    /// Required names in schema order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Rewrite serialization names listed in `fields` to their declared
    /// names. Names with no match in the table are kept as given.
    ///
    /// JSON Schema documents list the serialized keys (`display-name`);
    /// the required-field pass matches declared names (`DisplayName`).
    pub fn to_declared_names(&self, fields: &[FieldDescriptor]) -> Self {
        Self::new(self.required.iter().map(|name| {
            fields
                .iter()
                .find(|field| field.serial_name == name.as_str())
                .map_or(name.as_str(), |field| field.name)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_deduplicates_in_order() {
        let schema = SchemaDescriptor::new(["Name", "Series", "Name"]);
        assert_eq!(schema.required(), ["Name", "Series"]);
        assert!(schema.requires("Series"));
        assert!(!schema.requires("series"));
    }

    #[test]
    fn reads_required_array() {
        let doc = json!({
            "type": "object",
            "required": ["name", "architecture"],
            "properties": {}
        });
        let schema = SchemaDescriptor::from_json_schema(&doc).unwrap();
        assert_eq!(schema.required(), ["name", "architecture"]);
    }

    #[test]
    fn missing_required_is_empty() {
        let schema = SchemaDescriptor::from_json_schema(&json!({"type": "object"})).unwrap();
        assert!(schema.required().is_empty());
    }

    #[test]
    fn serialization_names_map_to_declared_names() {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::leaf("DisplayName", "display-name"),
            FieldDescriptor::leaf("Kernel", "kernel").omit_empty(),
        ];
        let schema = SchemaDescriptor::new(["display-name", "Kernel", "extra"]);
        let declared = schema.to_declared_names(FIELDS);
        assert_eq!(declared.required(), ["DisplayName", "Kernel", "extra"]);
        assert!(!declared.requires("display-name"));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert_eq!(
            SchemaDescriptor::from_json_schema(&json!([])),
            Err(SchemaDescriptorError::NotAnObject)
        );
        assert_eq!(
            SchemaDescriptor::from_json_schema(&json!({"required": "name"})),
            Err(SchemaDescriptorError::RequiredNotArray)
        );
        assert_eq!(
            SchemaDescriptor::from_json_schema(&json!({"required": ["name", 3]})),
            Err(SchemaDescriptorError::NonStringEntry { index: 1 })
        );
    }
}
