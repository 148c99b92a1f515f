//! # Default Populator
//!
//! Fills leaves that are at their zero value with the literal declared in
//! their [`FieldDescriptor`]. A leaf that already holds a value is never
//! overwritten, so applying defaults twice is the same as applying them
//! once.
//!
//! Only text and boolean leaves accept defaults. For booleans the literal
//! `"true"` means true and every other literal means false (case-sensitive).

use crate::error::CoreError;
use crate::field::{FieldDescriptor, Leaf, LeafKind, Root};
use crate::walk::{walk_root, Visitor};

/// Leaf visitor that writes declared defaults into unset leaves.
#[derive(Debug, Default)]
pub struct DefaultPopulator {
    applied: usize,
}

impl DefaultPopulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaves written so far.
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl Visitor for DefaultPopulator {
    fn visit_leaf(
        &mut self,
        parent: &'static str,
        field: &'static FieldDescriptor,
        leaf: &mut dyn Leaf,
    ) -> Result<(), CoreError> {
        let Some(literal) = field.default else {
            return Ok(());
        };

        if !leaf.is_zero() {
            return Ok(());
        }

        let unsupported = CoreError::UnsupportedDefaultType {
            kind: leaf.kind(),
            parent,
            field: field.name,
        };
        if !matches!(leaf.kind(), LeafKind::Text | LeafKind::Bool) {
            return Err(unsupported);
        }

        let written = match leaf.kind() {
            LeafKind::Text => leaf.set_text(literal),
            _ => leaf.set_bool(literal == "true"),
        };
        if !written {
            return Err(unsupported);
        }

        self.applied += 1;
        tracing::debug!(parent, field = field.name, default = literal, "applied default");
        Ok(())
    }
}

/// Apply declared defaults across the whole tree rooted at `root`.
///
/// # Errors
///
/// - [`CoreError::InvalidArgument`] if `root` is not a struct.
/// - [`CoreError::UnsupportedDefaultType`] if an unset leaf that is
///   neither text nor boolean declares a default. The pass stops at that
///   leaf.
pub fn apply_defaults<R: Root + ?Sized>(root: &mut R) -> Result<(), CoreError> {
    let mut populator = DefaultPopulator::new();
    walk_root("apply_defaults", root, &mut populator)?;
    tracing::debug!(applied = populator.applied(), "defaults pass complete");
    Ok(())
}
