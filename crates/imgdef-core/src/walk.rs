//! # Tree Walker
//!
//! Depth-first traversal of a registered struct tree, handing every leaf
//! to a [`Visitor`]. Fields are visited in declared order.
//!
//! - Absent struct pointers are skipped, never dereferenced.
//! - Collections are iterated by their logical length; elements that are
//!   not present struct pointers are skipped.
//! - The first error a visitor returns aborts the whole traversal.
//!
//! `Box` ownership rules out reference cycles, so the only bound needed is
//! on nesting depth ([`MAX_DEPTH`]).

use crate::error::{CoreError, DescriptorMismatch};
use crate::field::{Describe, FieldDescriptor, FieldRef, Leaf, Root};

/// Maximum number of nested struct levels below the root.
pub const MAX_DEPTH: usize = 64;

/// Per-leaf callback driven by [`walk`].
pub trait Visitor {
    /// Visit one leaf.
    ///
    /// `parent` is the type name of the struct owning the leaf.
    fn visit_leaf(
        &mut self,
        parent: &'static str,
        field: &'static FieldDescriptor,
        leaf: &mut dyn Leaf,
    ) -> Result<(), CoreError>;
}

/// Walk `root`, visiting every reachable leaf.
///
/// # Errors
///
/// - [`CoreError::InvalidArgument`] if `root` is not a struct; nothing is
///   visited.
/// - [`CoreError::DepthExceeded`] if nesting exceeds [`MAX_DEPTH`].
/// - [`CoreError::Descriptor`] if a field table disagrees with its struct.
/// - Any error returned by the visitor.
pub fn walk<R, V>(root: &mut R, visitor: &mut V) -> Result<(), CoreError>
where
    R: Root + ?Sized,
    V: Visitor + ?Sized,
{
    walk_root("walk", root, visitor)
}

pub(crate) fn walk_root<R, V>(
    operation: &'static str,
    root: &mut R,
    visitor: &mut V,
) -> Result<(), CoreError>
where
    R: Root + ?Sized,
    V: Visitor + ?Sized,
{
    let found = root.shape();
    let node = root
        .as_struct()
        .ok_or(CoreError::InvalidArgument { operation, found })?;
    walk_struct(node, visitor, 0)
}

fn walk_struct<V>(node: &mut dyn Describe, visitor: &mut V, depth: usize) -> Result<(), CoreError>
where
    V: Visitor + ?Sized,
{
    let parent = node.type_name();
    if depth > MAX_DEPTH {
        return Err(CoreError::DepthExceeded {
            type_name: parent,
            limit: MAX_DEPTH,
        });
    }

    for (index, descriptor) in node.fields().iter().enumerate() {
        let field = node.field_mut(index).ok_or(CoreError::Descriptor {
            parent,
            field: descriptor.name,
            reason: DescriptorMismatch::MissingAccessor { index },
        })?;

        let actual = field.kind();
        if actual != descriptor.kind {
            return Err(CoreError::Descriptor {
                parent,
                field: descriptor.name,
                reason: DescriptorMismatch::Shape {
                    declared: descriptor.kind,
                    actual,
                },
            });
        }

        match field {
            FieldRef::Leaf(leaf) => visitor.visit_leaf(parent, descriptor, leaf)?,
            FieldRef::Struct(Some(child)) => walk_struct(child, visitor, depth + 1)?,
            FieldRef::Struct(None) => {
                tracing::trace!(parent, field = descriptor.name, "skipping absent struct");
            }
            FieldRef::Collection(elements) => {
                for child in elements.into_iter().flatten() {
                    walk_struct(child, visitor, depth + 1)?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{AsField, FieldDescriptor, FieldKind, LeafKind};

    /// Records every visited leaf as `Parent.Field`.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl Visitor for Recorder {
        fn visit_leaf(
            &mut self,
            parent: &'static str,
            field: &'static FieldDescriptor,
            _leaf: &mut dyn Leaf,
        ) -> Result<(), CoreError> {
            self.seen.push(format!("{parent}.{}", field.name));
            Ok(())
        }
    }

    /// Fails on the first leaf named `Stop`.
    struct StopAt;

    impl Visitor for StopAt {
        fn visit_leaf(
            &mut self,
            parent: &'static str,
            field: &'static FieldDescriptor,
            leaf: &mut dyn Leaf,
        ) -> Result<(), CoreError> {
            if field.name == "Stop" {
                return Err(CoreError::UnsupportedDefaultType {
                    kind: leaf.kind(),
                    parent,
                    field: field.name,
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct Leafy {
        a: String,
        stop: u8,
        b: bool,
    }

    crate::describe!(Leafy {
        a => FieldDescriptor::leaf("A", "a"),
        stop => FieldDescriptor::leaf("Stop", "stop"),
        b => FieldDescriptor::leaf("B", "b"),
    });

    #[derive(Default)]
    struct Tree {
        title: String,
        child: Option<Box<Leafy>>,
        list: Vec<Option<Box<Leafy>>>,
        tags: Vec<String>,
    }

    crate::describe!(Tree {
        title => FieldDescriptor::leaf("Title", "title"),
        child => FieldDescriptor::nested("Child", "child"),
        list => FieldDescriptor::collection("List", "list"),
        tags => FieldDescriptor::collection("Tags", "tags"),
    });

    #[test]
    fn visits_in_declared_order_depth_first() {
        let mut tree = Tree {
            child: Some(Box::default()),
            list: vec![Some(Box::default()), None, Some(Box::default())],
            tags: vec!["x".into()],
            ..Tree::default()
        };
        let mut recorder = Recorder::default();
        walk(&mut tree, &mut recorder).unwrap();

        let leafy = ["Leafy.A", "Leafy.Stop", "Leafy.B"];
        let mut expected = vec!["Tree.Title".to_string()];
        for _ in 0..3 {
            expected.extend(leafy.iter().map(|s| s.to_string()));
        }
        assert_eq!(recorder.seen, expected);
    }

    #[test]
    fn absent_child_is_skipped() {
        let mut tree = Tree::default();
        let mut recorder = Recorder::default();
        walk(&mut tree, &mut recorder).unwrap();
        assert_eq!(recorder.seen, ["Tree.Title"]);
    }

    #[test]
    fn visitor_error_aborts_walk() {
        let mut tree = Tree {
            child: Some(Box::default()),
            ..Tree::default()
        };
        let err = walk(&mut tree, &mut StopAt).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnsupportedDefaultType {
                kind: LeafKind::Uint,
                parent: "Leafy",
                field: "Stop"
            }
        ));
    }

    #[test]
    fn non_struct_root_is_rejected() {
        let mut text = String::from("not a struct");
        let err = walk(&mut text, &mut Recorder::default()).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidArgument {
                operation: "walk",
                found: "string"
            }
        );

        let mut missing: Option<Box<Tree>> = None;
        let mut recorder = Recorder::default();
        let err = walk(&mut missing, &mut recorder).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { found: "nil pointer", .. }));
        assert!(recorder.seen.is_empty());
    }

    #[test]
    fn dyn_root_is_accepted() {
        let mut tree = Tree::default();
        let root: &mut dyn Describe = &mut tree;
        let mut recorder = Recorder::default();
        walk(root, &mut recorder).unwrap();
        assert_eq!(recorder.seen.len(), 1);
    }

    /// A struct whose table lies about its second field.
    struct Mislabeled {
        name: String,
        child: Option<Box<Leafy>>,
    }

    impl Describe for Mislabeled {
        fn type_name(&self) -> &'static str {
            "Mislabeled"
        }

        fn fields(&self) -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::leaf("Name", "name"),
                FieldDescriptor::leaf("Child", "child"),
                FieldDescriptor::leaf("Ghost", "ghost"),
            ];
            FIELDS
        }

        fn field_mut(&mut self, index: usize) -> Option<FieldRef<'_>> {
            match index {
                0 => Some(self.name.as_field()),
                1 => Some(self.child.as_field()),
                _ => None,
            }
        }
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let mut node = Mislabeled {
            name: String::new(),
            child: None,
        };
        let root: &mut dyn Describe = &mut node;
        let err = walk(root, &mut Recorder::default()).unwrap_err();
        assert_eq!(
            err,
            CoreError::Descriptor {
                parent: "Mislabeled",
                field: "Child",
                reason: DescriptorMismatch::Shape {
                    declared: FieldKind::Leaf,
                    actual: FieldKind::Struct,
                },
            }
        );
    }

    /// A chain of nested nodes used to exercise the depth bound.
    #[derive(Default)]
    struct Link {
        next: Option<Box<Link>>,
    }

    crate::describe!(Link {
        next => FieldDescriptor::nested("Next", "next"),
    });

    fn chain(len: usize) -> Link {
        let mut head = Link::default();
        for _ in 0..len {
            head = Link {
                next: Some(Box::new(head)),
            };
        }
        head
    }

    #[test]
    fn depth_bound_is_enforced() {
        let mut shallow = chain(MAX_DEPTH);
        walk(&mut shallow, &mut Recorder::default()).unwrap();

        let mut deep = chain(MAX_DEPTH + 1);
        let err = walk(&mut deep, &mut Recorder::default()).unwrap_err();
        assert_eq!(
            err,
            CoreError::DepthExceeded {
                type_name: "Link",
                limit: MAX_DEPTH
            }
        );
    }
}
