//! # Definition Validation
//!
//! Loads an image definition document and checks it in three passes:
//!
//! 1. decode YAML and fill declared defaults ([`apply_defaults`]),
//! 2. validate the defaulted document against a JSON Schema (Draft 7),
//! 3. report required fields still at their zero value
//!    ([`validate_required_fields`]).
//!
//! Findings from passes 2 and 3 land in one [`ValidationResult`], so a
//! caller sees every problem in a document at once instead of fixing them
//! one by one.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use imgdef_core::{
    apply_defaults, validate_required_fields, CoreError, Describe, JsonContext, Root,
    SchemaDescriptor, SchemaDescriptorError, ValidationError, ValidationResult,
};
use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::definition::ImageDefinition;

/// Schema shipped with the crate.
pub const DEFAULT_SCHEMA_NAME: &str = "image_definition.schema.json";

const DEFAULT_SCHEMA: &str = include_str!("../schemas/image_definition.schema.json");

/// Error loading or checking an image definition.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The schema document could not be read or parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoad { schema_name: String, reason: String },

    /// The schema parsed but could not be compiled.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuild { schema_name: String, reason: String },

    /// The definition could not be read or decoded.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad { path: String, reason: String },

    /// A traversal pass failed structurally.
    #[error(transparent)]
    Traversal(#[from] CoreError),

    /// The definition decoded but failed validation.
    #[error("image definition '{path}' is invalid:\n{result}")]
    Invalid { path: String, result: ValidationResult },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A compiled JSON Schema plus the required-name list taken from it.
pub struct DefinitionSchema {
    name: String,
    document: Value,
    descriptor: SchemaDescriptor,
    validator: Validator,
}

impl DefinitionSchema {
    /// The schema embedded in this crate.
    pub fn embedded() -> Result<Self, DefinitionError> {
        let document: Value =
            serde_json::from_str(DEFAULT_SCHEMA).map_err(|e| DefinitionError::SchemaLoad {
                schema_name: DEFAULT_SCHEMA_NAME.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;
        Self::from_value(DEFAULT_SCHEMA_NAME, document)
    }

    /// Load a schema from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| DefinitionError::SchemaLoad {
            schema_name: name.clone(),
            reason: e.to_string(),
        })?;
        let document: Value =
            serde_json::from_str(&content).map_err(|e| DefinitionError::SchemaLoad {
                schema_name: name.clone(),
                reason: format!("invalid JSON: {e}"),
            })?;
        Self::from_value(name, document)
    }

    /// Compile an already parsed schema document.
    ///
    /// Top-level `required` entries that name YAML keys of
    /// [`ImageDefinition`] are stored under the field's declared name.
    pub fn from_value(name: impl Into<String>, document: Value) -> Result<Self, DefinitionError> {
        let name = name.into();
        let descriptor = SchemaDescriptor::from_json_schema(&document)
            .map_err(|e: SchemaDescriptorError| DefinitionError::SchemaLoad {
                schema_name: name.clone(),
                reason: e.to_string(),
            })?
            .to_declared_names(ImageDefinition::default().fields());

        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft7);
        let validator = opts
            .build(&document)
            .map_err(|e| DefinitionError::ValidatorBuild {
                schema_name: name.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            schema = %name,
            required = descriptor.required().len(),
            "compiled definition schema"
        );
        Ok(Self {
            name,
            document,
            descriptor,
            validator,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Names listed in the schema's top-level `required` array.
    pub fn descriptor(&self) -> &SchemaDescriptor {
        &self.descriptor
    }

    /// Append every structural violation of `instance` to `sink`.
    ///
    /// The error type is the failing schema keyword (`enum`, `type`,
    /// `pattern`, ...) and the context follows the instance path.
    pub fn validate_value(&self, instance: &Value, sink: &mut ValidationResult) {
        sink.extend(self.validator.iter_errors(instance).map(|e| {
            let instance_path = e.instance_path.to_string();
            let schema_path = e.schema_path.to_string();
            let keyword = schema_path
                .rsplit('/')
                .find(|segment| !segment.is_empty())
                .unwrap_or("schema")
                .to_string();
            let details = BTreeMap::from([
                ("instance_path".to_string(), instance_path.clone()),
                ("schema_path".to_string(), schema_path),
            ]);
            ValidationError::new(
                JsonContext::from_pointer(&instance_path),
                keyword,
                &e.to_string(),
                details,
            )
        }));
    }
}

impl fmt::Debug for DefinitionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionSchema")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// A decoded, defaulted document together with everything found wrong
/// with it.
#[derive(Debug, Clone)]
pub struct CheckedDefinition<T = ImageDefinition> {
    pub definition: T,
    pub result: ValidationResult,
}

impl<T> CheckedDefinition<T> {
    pub fn is_valid(&self) -> bool {
        self.result.valid()
    }
}

/// Decode `yaml` as `T` and run all three passes.
///
/// Validation findings are returned in the result; only decode and
/// traversal failures are errors.
pub fn check_document<T>(
    yaml: &str,
    origin: &str,
    schema: &DefinitionSchema,
) -> Result<CheckedDefinition<T>, DefinitionError>
where
    T: DeserializeOwned + Serialize + Root,
{
    let mut definition: T =
        serde_yaml::from_str(yaml).map_err(|e| DefinitionError::DocumentLoad {
            path: origin.to_string(),
            reason: format!("invalid YAML: {e}"),
        })?;

    apply_defaults(&mut definition)?;

    let mut result = ValidationResult::new();
    let instance = serde_json::to_value(&definition).map_err(|e| DefinitionError::DocumentLoad {
        path: origin.to_string(),
        reason: format!("cannot convert to JSON: {e}"),
    })?;
    schema.validate_value(&instance, &mut result);
    let structural = result.len();

    validate_required_fields(&mut definition, schema.descriptor(), &mut result)?;

    tracing::info!(
        document = origin,
        schema = schema.name(),
        structural,
        missing = result.len() - structural,
        "checked definition"
    );
    Ok(CheckedDefinition { definition, result })
}

/// [`check_document`] for [`ImageDefinition`].
pub fn check_definition(
    yaml: &str,
    schema: &DefinitionSchema,
) -> Result<CheckedDefinition, DefinitionError> {
    check_document(yaml, "<inline>", schema)
}

/// Read, check, and accept an image definition file.
///
/// # Errors
///
/// [`DefinitionError::Invalid`] carries every finding when the file fails
/// validation.
pub fn load_definition(
    path: impl AsRef<Path>,
    schema: &DefinitionSchema,
) -> Result<ImageDefinition, DefinitionError> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let origin = path.display().to_string();
    let yaml = std::fs::read_to_string(&path).map_err(|e| DefinitionError::DocumentLoad {
        path: origin.clone(),
        reason: e.to_string(),
    })?;

    let checked = check_document::<ImageDefinition>(&yaml, &origin, schema)?;
    if checked.is_valid() {
        Ok(checked.definition)
    } else {
        Err(DefinitionError::Invalid {
            path: origin,
            result: checked.result,
        })
    }
}
