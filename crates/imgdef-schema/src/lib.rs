//! # imgdef-schema: Image Definition Loading
//!
//! The typed image definition model and the loading pipeline built on
//! `imgdef-core`.
//!
//! ## Model (`definition`)
//!
//! [`ImageDefinition`] and its nested structs decode from the YAML image
//! definition format. Each struct registers its field table with
//! `describe!`, declaring defaults (rootfs mirror, snap channel, ...) and
//! which keys may be omitted.
//!
//! ## Validation (`validate`)
//!
//! - [`DefinitionSchema`] compiles the JSON Schema (the embedded
//!   `image_definition.schema.json` or a file) and exposes its top-level
//!   `required` list as a `SchemaDescriptor`.
//! - [`check_definition`] decodes, fills defaults, and collects structural
//!   and missing-field findings into one `ValidationResult`.
//! - [`load_definition`] reads a file and rejects it with every finding
//!   attached when anything is wrong.
//!
//! ## Crate Policy
//!
//! - Depends only on `imgdef-core` internally.
//! - Defaults are applied before schema validation, so a key with a
//!   declared default is never reported missing.

pub mod definition;
pub mod validate;

pub use definition::{
    Artifact, Customization, Filelist, Fstab, Gadget, ImageDefinition, Img, Manifest, Package,
    Ppa, Qcow2, Rootfs, RootfsTar, Seed, Snap, Tarball,
};
pub use validate::{
    check_definition, check_document, load_definition, CheckedDefinition, DefinitionError,
    DefinitionSchema, DEFAULT_SCHEMA_NAME,
};
