//! # Show Subcommand
//!
//! Prints a definition the way the build sees it: decoded, with declared
//! defaults filled in. Invalid definitions are rejected with every finding.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use imgdef_schema::load_definition;

/// Arguments for the `imgdef show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Image definition file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON Schema to validate against instead of the built-in one.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

pub fn run_show(args: &ShowArgs, out: &mut dyn Write) -> Result<u8> {
    let schema = crate::load_schema(args.schema.as_deref())?;
    let definition = load_definition(&args.file, &schema)?;
    let yaml = serde_yaml::to_string(&definition).context("cannot render definition as YAML")?;
    out.write_all(yaml.as_bytes())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgdef_schema::{DefinitionError, ImageDefinition};

    #[test]
    fn prints_defaulted_definition() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.yaml");
        std::fs::write(
            &file,
            "name: n\ndisplay-name: d\narchitecture: amd64\nseries: noble\nclass: cloud\n\
             rootfs:\n  components: [main]\nartifacts:\n  manifest:\n    name: m\n",
        )
        .unwrap();

        let mut out = Vec::new();
        let code = run_show(&ShowArgs { file, schema: None }, &mut out).unwrap();
        assert_eq!(code, 0);

        let shown: ImageDefinition = serde_yaml::from_slice(&out).unwrap();
        let rootfs = shown.rootfs.unwrap();
        assert_eq!(rootfs.mirror, "http://archive.ubuntu.com/ubuntu/");
        assert_eq!(rootfs.components, ["main"]);
    }

    #[test]
    fn invalid_definition_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.yaml");
        std::fs::write(&file, "{}\n").unwrap();

        let err = run_show(&ShowArgs { file, schema: None }, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DefinitionError>(),
            Some(DefinitionError::Invalid { .. })
        ));
    }
}
