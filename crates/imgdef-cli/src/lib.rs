//! # imgdef-cli: Image Definition CLI
//!
//! Provides the `imgdef` command-line interface.
//!
//! ## Subcommands
//!
//! - `imgdef validate`: check definitions, reporting every finding.
//! - `imgdef show`: print a definition with defaults filled in.
//! - `imgdef du`: measure a directory with `du`.
//!
//! ```bash
//! imgdef validate definitions/*.yaml
//! imgdef validate --format json --schema strict.schema.json server.yaml
//! imgdef show definitions/ubuntu-server-amd64.yaml
//! ```
//!
//! Handlers return the process exit code: 0 on success, 1 when a
//! definition is invalid. Operational failures are returned as errors.

pub mod du;
pub mod show;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use imgdef_schema::DefinitionSchema;

/// Load the schema at `path`, or the embedded one when none is given.
pub fn load_schema(path: Option<&Path>) -> Result<DefinitionSchema> {
    let schema = match path {
        Some(path) => DefinitionSchema::from_file(path)
            .with_context(|| format!("failed to load schema {}", path.display()))?,
        None => DefinitionSchema::embedded().context("failed to load embedded schema")?,
    };
    tracing::info!(
        schema = schema.name(),
        required = schema.descriptor().required().len(),
        "loaded definition schema"
    );
    Ok(schema)
}
