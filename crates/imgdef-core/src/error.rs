//! # Error Types: Traversal Failures
//!
//! Errors that abort a traversal pass. Missing required fields are not
//! errors at this level: they are accumulated as data in a
//! [`ValidationResult`](crate::ValidationResult) and never stop a walk.
//!
//! ## Design
//!
//! - Structural misuse (the root is not a struct) fails before any field
//!   is visited.
//! - Unsupported default literals abort the pass at the offending leaf and
//!   name the leaf kind.
//! - Registration defects in a `describe!` table are reported with the
//!   owning type and field so they can be fixed at the declaration.

use thiserror::Error;

use crate::field::{FieldKind, LeafKind};

/// Error raised by a traversal pass over a configuration tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The traversal root is not a reference to a mutable struct.
    #[error("the argument to {operation} must be a mutable struct reference, got {found}")]
    InvalidArgument {
        /// Entry point that rejected the root.
        operation: &'static str,
        /// What was supplied instead.
        found: &'static str,
    },

    /// A leaf declares a default literal but its kind cannot hold one.
    #[error("setting default value of type {kind} not supported (field {parent}.{field})")]
    UnsupportedDefaultType {
        /// Kind of the offending leaf.
        kind: LeafKind,
        /// Type name of the struct that owns the leaf.
        parent: &'static str,
        /// Declared name of the leaf.
        field: &'static str,
    },

    /// Nesting went deeper than the walker allows.
    #[error("struct nesting exceeds {limit} levels at {type_name}")]
    DepthExceeded {
        /// Type at which the limit was hit.
        type_name: &'static str,
        /// The configured limit.
        limit: usize,
    },

    /// A field table disagrees with the struct it describes.
    #[error("descriptor for {parent}.{field} is inconsistent: {reason}")]
    Descriptor {
        /// Type name of the described struct.
        parent: &'static str,
        /// Declared name of the field.
        field: &'static str,
        /// What disagrees.
        reason: DescriptorMismatch,
    },
}

/// The way a field table disagrees with its struct.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorMismatch {
    /// The table declares one shape but the accessor yields another.
    #[error("declared as {declared}, accessor yields {actual}")]
    Shape {
        /// Kind in the static table.
        declared: FieldKind,
        /// Kind of the runtime field.
        actual: FieldKind,
    },

    /// The table has an entry with no accessor behind it.
    #[error("no accessor for field index {index}")]
    MissingAccessor {
        /// Position in the field table.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_default_names_kind() {
        let err = CoreError::UnsupportedDefaultType {
            kind: LeafKind::Int,
            parent: "Fstab",
            field: "FsckOrder",
        };
        let msg = err.to_string();
        assert!(msg.contains("type int not supported"), "{msg}");
        assert!(msg.contains("Fstab.FsckOrder"), "{msg}");
    }

    #[test]
    fn invalid_argument_names_operation() {
        let err = CoreError::InvalidArgument {
            operation: "apply_defaults",
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "the argument to apply_defaults must be a mutable struct reference, got string"
        );
    }

    #[test]
    fn descriptor_shape_mismatch_display() {
        let err = CoreError::Descriptor {
            parent: "Rootfs",
            field: "Seed",
            reason: DescriptorMismatch::Shape {
                declared: FieldKind::Leaf,
                actual: FieldKind::Struct,
            },
        };
        assert!(err.to_string().contains("declared as leaf, accessor yields struct"));
    }
}
