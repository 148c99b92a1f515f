//! # Required-Field Validator
//!
//! Finds required leaves that still hold their zero value and records one
//! [`ValidationError`] per finding. Findings never stop the walk: every
//! violation in the tree is collected in a single pass.
//!
//! A leaf is required when its descriptor lacks the omit-if-empty marker
//! or the [`SchemaDescriptor`] lists it.

use crate::error::CoreError;
use crate::field::{FieldDescriptor, Leaf, Root};
use crate::report::{ValidationError, ValidationResult};
use crate::schema::SchemaDescriptor;
use crate::walk::{walk_root, Visitor};

/// Leaf visitor that records missing required fields into a sink.
#[derive(Debug)]
pub struct RequiredFieldValidator<'a> {
    schema: &'a SchemaDescriptor,
    sink: &'a mut ValidationResult,
}

impl<'a> RequiredFieldValidator<'a> {
    pub fn new(schema: &'a SchemaDescriptor, sink: &'a mut ValidationResult) -> Self {
        Self { schema, sink }
    }
}

impl Visitor for RequiredFieldValidator<'_> {
    fn visit_leaf(
        &mut self,
        parent: &'static str,
        field: &'static FieldDescriptor,
        leaf: &mut dyn Leaf,
    ) -> Result<(), CoreError> {
        if field.is_required(self.schema) && leaf.is_zero() {
            tracing::debug!(parent, property = field.serial_name, "required field is missing");
            self.sink
                .add_error(ValidationError::missing_field(field.serial_name, parent));
        }
        Ok(())
    }
}

/// Append every missing required field under `root` to `sink`.
///
/// # Errors
///
/// Only structural failures are errors: [`CoreError::InvalidArgument`]
/// when `root` is not a struct, plus the walker's depth and descriptor
/// checks. Missing fields are recorded in `sink`, not returned.
pub fn validate_required_fields<R: Root + ?Sized>(
    root: &mut R,
    schema: &SchemaDescriptor,
    sink: &mut ValidationResult,
) -> Result<(), CoreError> {
    let before = sink.len();
    let mut validator = RequiredFieldValidator::new(schema, sink);
    walk_root("validate_required_fields", root, &mut validator)?;
    tracing::debug!(missing = sink.len() - before, "required-field pass complete");
    Ok(())
}

/// Like [`validate_required_fields`], collecting into a fresh result.
pub fn required_field_errors<R: Root + ?Sized>(
    root: &mut R,
    schema: &SchemaDescriptor,
) -> Result<ValidationResult, CoreError> {
    let mut result = ValidationResult::new();
    validate_required_fields(root, schema, &mut result)?;
    Ok(result)
}
