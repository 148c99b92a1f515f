//! # imgdef-core: Metadata-Driven Configuration Traversal
//!
//! Applies two policies over arbitrarily nested configuration structs
//! without type-specific traversal code:
//!
//! 1. **Defaults** ([`apply_defaults`]): leaves at their zero value receive
//!    the literal declared in their field descriptor.
//! 2. **Required fields** ([`validate_required_fields`]): required leaves
//!    still at their zero value are recorded as structured
//!    [`ValidationError`]s. All findings are accumulated in one pass.
//!
//! ## Field Metadata
//!
//! Each struct registers a static table of [`FieldDescriptor`]s with the
//! [`describe!`] macro: declared name, serialization name, shape (leaf,
//! struct pointer, collection), optional default literal, and the
//! omit-if-empty marker. The walker consults that table; nothing is
//! discovered at runtime.
//!
//! ## Expected Call Order
//!
//! ```text
//! decode document → apply_defaults → validate_required_fields → report sink
//! ```
//!
//! ## Crate Policy
//!
//! - Purely synchronous; no I/O during traversal.
//! - Traversal never adds or removes collection elements; only leaves are
//!   written, and only by the defaults pass.
//! - No `unsafe` code. No `.unwrap()` outside tests.

pub mod defaults;
pub mod error;
pub mod field;
pub mod report;
pub mod required;
pub mod schema;
pub mod walk;

pub use defaults::{apply_defaults, DefaultPopulator};
pub use error::{CoreError, DescriptorMismatch};
pub use field::{
    AsField, Describe, Element, FieldDescriptor, FieldKind, FieldRef, Leaf, LeafKind, Root,
};
pub use report::{JsonContext, ValidationError, ValidationResult, MISSING_FIELD_ERROR};
pub use required::{required_field_errors, validate_required_fields, RequiredFieldValidator};
pub use schema::{SchemaDescriptor, SchemaDescriptorError};
pub use walk::{walk, Visitor, MAX_DEPTH};
