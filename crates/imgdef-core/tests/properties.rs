//! Property tests for the defaults and required-field passes.

use imgdef_core::{
    apply_defaults, describe, required_field_errors, FieldDescriptor, SchemaDescriptor,
};
use proptest::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Item {
    name: String,
    flag: bool,
    note: String,
}

describe!(Item {
    name => FieldDescriptor::leaf("Name", "name"),
    flag => FieldDescriptor::leaf("Flag", "flag").omit_empty().default_value("true"),
    note => FieldDescriptor::leaf("Note", "note").omit_empty().default_value("none"),
});

#[derive(Debug, Default, Clone, PartialEq)]
struct Catalog {
    owner: String,
    items: Vec<Option<Box<Item>>>,
}

describe!(Catalog {
    owner => FieldDescriptor::leaf("Owner", "owner").omit_empty(),
    items => FieldDescriptor::collection("Items", "items"),
});

fn item() -> impl Strategy<Value = Option<Box<Item>>> {
    let present = ("[a-z]{0,4}", any::<bool>(), "[a-z]{0,4}")
        .prop_map(|(name, flag, note)| Some(Box::new(Item { name, flag, note })));
    prop_oneof![1 => Just(None), 4 => present]
}

fn catalog() -> impl Strategy<Value = Catalog> {
    ("[a-z]{0,4}", prop::collection::vec(item(), 0..12))
        .prop_map(|(owner, items)| Catalog { owner, items })
}

proptest! {
    /// A second defaults pass never changes anything.
    #[test]
    fn defaults_are_idempotent(mut value in catalog()) {
        apply_defaults(&mut value).unwrap();
        let once = value.clone();
        apply_defaults(&mut value).unwrap();
        prop_assert_eq!(value, once);
    }

    /// Defaults only fill empty leaves and never touch set ones.
    #[test]
    fn defaults_never_override(original in catalog()) {
        let mut value = original.clone();
        apply_defaults(&mut value).unwrap();
        prop_assert_eq!(value.items.len(), original.items.len());
        for (before, after) in original.items.iter().zip(&value.items) {
            match (before, after) {
                (Some(before), Some(after)) => {
                    prop_assert_eq!(&after.name, &before.name);
                    prop_assert!(after.flag);
                    if before.note.is_empty() {
                        prop_assert_eq!(after.note.as_str(), "none");
                    } else {
                        prop_assert_eq!(&after.note, &before.note);
                    }
                }
                (None, None) => {}
                _ => prop_assert!(false, "element presence changed"),
            }
        }
    }

    /// One error per present element with an empty required name, plus one
    /// for the owner when the schema requires it.
    #[test]
    fn missing_field_count_matches_zero_leaves(mut value in catalog(), owner_required in any::<bool>()) {
        let schema = if owner_required {
            SchemaDescriptor::new(["Owner"])
        } else {
            SchemaDescriptor::default()
        };
        let expected_items = value
            .items
            .iter()
            .flatten()
            .filter(|item| item.name.is_empty())
            .count();
        let expected_owner = usize::from(owner_required && value.owner.is_empty());

        let result = required_field_errors(&mut value, &schema).unwrap();
        prop_assert_eq!(result.len(), expected_items + expected_owner);
    }
}
