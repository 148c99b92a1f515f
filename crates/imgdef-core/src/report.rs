//! # Validation Report
//!
//! Structured validation errors in the shape consumed by JSON Schema report
//! tooling: a dotted context label, an error type, a rendered description,
//! and a detail map. Missing-field findings from the required-field pass
//! and structural violations from schema validation share this record, so
//! a caller can report both from one [`ValidationResult`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Error type of a missing required field.
pub const MISSING_FIELD_ERROR: &str = "missing_field_error";

/// Outer context label of missing-field errors.
pub const IMAGE_DEFINITION_CONTEXT: &str = "image_definition";

/// Inner context label of missing-field errors.
pub const MISSING_FIELD_CONTEXT: &str = "missing_field";

/// Context label of the document root.
pub const ROOT_CONTEXT: &str = "(root)";

const MISSING_FIELD_DESCRIPTION: &str =
    "Key \"{{.property}}\" is required in struct \"{{.parent}}\", but is not in the YAML file!";

/// Linked context label: `head` nested inside `tail`.
///
/// Renders outermost first, joined with dots (`image_definition.missing_field`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonContext {
    head: String,
    tail: Option<Box<JsonContext>>,
}

impl JsonContext {
    pub fn new(head: impl Into<String>, tail: Option<JsonContext>) -> Self {
        Self {
            head: head.into(),
            tail: tail.map(Box::new),
        }
    }

    /// The `(root)` context.
    pub fn root() -> Self {
        Self::new(ROOT_CONTEXT, None)
    }

    /// Build a context from a JSON Pointer (`/rootfs/seed/urls/0`),
    /// anchored at `(root)`.
    pub fn from_pointer(pointer: &str) -> Self {
        pointer
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .fold(Self::root(), |outer, segment| Self::new(segment, Some(outer)))
    }

    /// Innermost label.
    pub fn head(&self) -> &str {
        &self.head
    }

    /// All labels, outermost first.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        let mut current = Some(self);
        while let Some(context) = current {
            labels.push(context.head.as_str());
            current = context.tail.as_deref();
        }
        labels.reverse();
        labels
    }
}

impl fmt::Display for JsonContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels().join("."))
    }
}

impl Serialize for JsonContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    context: JsonContext,
    #[serde(rename = "type")]
    error_type: String,
    description: String,
    details: BTreeMap<String, String>,
}

impl ValidationError {
    /// Build an error, rendering `{{.key}}` placeholders in
    /// `description_format` from `details`.
    pub fn new(
        context: JsonContext,
        error_type: impl Into<String>,
        description_format: &str,
        details: BTreeMap<String, String>,
    ) -> Self {
        let description = render_description(description_format, &details);
        Self {
            context,
            error_type: error_type.into(),
            description,
            details,
        }
    }

    /// A required field of `parent` holds its zero value.
    ///
    /// `property` is the field's serialization name.
    pub fn missing_field(property: &str, parent: &str) -> Self {
        let context = JsonContext::new(
            MISSING_FIELD_CONTEXT,
            Some(JsonContext::new(IMAGE_DEFINITION_CONTEXT, None)),
        );
        let details = BTreeMap::from([
            ("parent".to_string(), parent.to_string()),
            ("property".to_string(), property.to_string()),
        ]);
        Self::new(context, MISSING_FIELD_ERROR, MISSING_FIELD_DESCRIPTION, details)
    }

    pub fn context(&self) -> &JsonContext {
        &self.context
    }

    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &BTreeMap<String, String> {
        &self.details
    }

    /// Offending property, if recorded.
    pub fn property(&self) -> Option<&str> {
        self.details.get("property").map(String::as_str)
    }

    /// Type name of the struct owning the property, if recorded.
    pub fn parent(&self) -> Option<&str> {
        self.details.get("parent").map(String::as_str)
    }

    /// Context rendered without the leading `(root).` label.
    pub fn field(&self) -> String {
        let rendered = self.context.to_string();
        match rendered.strip_prefix(ROOT_CONTEXT) {
            Some("") => ROOT_CONTEXT.to_string(),
            Some(rest) => rest.trim_start_matches('.').to_string(),
            None => rendered,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field(), self.description)
    }
}

/// Substitute `{{.key}}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned. Placeholders with no matching
/// detail, and an unterminated `{{.`, are kept verbatim.
fn render_description(format: &str, details: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(format.len());
    let mut rest = format;
    while let Some(start) = rest.find("{{.") {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        let Some(end) = after.find("}}") else {
            rendered.push_str(&rest[start..]);
            return rendered;
        };
        match details.get(&after[..end]) {
            Some(value) => rendered.push_str(value),
            None => rendered.push_str(&rest[start..start + 3 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    rendered.push_str(rest);
    rendered
}

/// Append-only, ordered collection of validation errors.
///
/// Owned by the caller and lent exclusively to one pass at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when no errors were recorded.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl Extend<ValidationError> for ValidationResult {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {error}")?;
        }
        Ok(())
    }
}
