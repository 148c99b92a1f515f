//! # Validate Subcommand
//!
//! Checks image definitions against the definition schema, with defaults
//! applied first, and prints every finding per file.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use imgdef_core::ValidationError;
use imgdef_schema::{check_document, DefinitionSchema, ImageDefinition};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the `imgdef validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Image definition files to check.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// JSON Schema to validate against instead of the built-in one.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    valid: bool,
    errors: Vec<ValidationError>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every file is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let schema = crate::load_schema(args.schema.as_deref())?;

    let reports = args
        .files
        .iter()
        .map(|path| check_file(&schema, path))
        .collect::<Result<Vec<_>>>()?;

    match args.format {
        ReportFormat::Text => write_text(&reports, out)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &reports)?;
            writeln!(out)?;
        }
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        tracing::warn!(failed, total = reports.len(), "definitions failed validation");
        Ok(1)
    } else {
        Ok(0)
    }
}

fn check_file(schema: &DefinitionSchema, path: &Path) -> Result<FileReport> {
    let origin = path.display().to_string();
    let yaml = std::fs::read_to_string(path).with_context(|| format!("cannot read {origin}"))?;
    let checked = check_document::<ImageDefinition>(&yaml, &origin, schema)?;
    Ok(FileReport {
        valid: checked.is_valid(),
        errors: checked.result.into_inner(),
        path: origin,
    })
}

fn write_text(reports: &[FileReport], out: &mut dyn Write) -> Result<()> {
    for report in reports {
        if report.valid {
            writeln!(out, "PASS: {}", report.path)?;
            continue;
        }
        writeln!(out, "FAIL: {}", report.path)?;
        for error in &report.errors {
            writeln!(out, "  - {error}")?;
        }
    }

    let passed = reports.iter().filter(|r| r.valid).count();
    writeln!(out, "\nDefinitions: {passed}/{} passed", reports.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_root() -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates
        dir.pop(); // repo root
        dir
    }

    fn args(files: Vec<PathBuf>, format: ReportFormat) -> ValidateArgs {
        ValidateArgs {
            files,
            schema: None,
            format,
        }
    }

    fn write_definition(dir: &Path, name: &str, yaml: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn shipped_definitions_pass() {
        let files = vec![
            repo_root().join("definitions/ubuntu-server-amd64.yaml"),
            repo_root().join("definitions/ubuntu-cloud-tarball.yaml"),
        ];
        let mut out = Vec::new();
        let code = run_validate(&args(files, ReportFormat::Text), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(code, 0, "{text}");
        assert!(text.contains("Definitions: 2/2 passed"));
    }

    #[test]
    fn text_report_lists_every_finding() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_definition(dir.path(), "partial.yaml", "series: noble\nclass: cloud\n");

        let mut out = Vec::new();
        let code = run_validate(&args(vec![path], ReportFormat::Text), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(code, 1);
        assert!(text.contains("FAIL: "));
        assert!(text.contains(
            r#"  - image_definition.missing_field: Key "display-name" is required in struct "ImageDefinition", but is not in the YAML file!"#
        ));
        assert!(text.contains(r#"Key "architecture" is required"#));
        assert!(text.contains("Definitions: 0/1 passed"));
    }

    #[test]
    fn json_report_is_machine_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_definition(dir.path(), "partial.yaml", "name: only-a-name\n");

        let mut out = Vec::new();
        let code = run_validate(&args(vec![path], ReportFormat::Json), &mut out).unwrap();
        assert_eq!(code, 1);

        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let file = &report[0];
        assert_eq!(file["valid"], false);
        let missing: Vec<&str> = file["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["type"] == "missing_field_error")
            .filter_map(|e| e["details"]["property"].as_str())
            .collect();
        assert_eq!(missing, ["display-name", "architecture", "series", "class"]);
    }

    #[test]
    fn unreadable_file_is_an_operational_error() {
        let files = vec![PathBuf::from("/nonexistent/definition.yaml")];
        let mut out = Vec::new();
        assert!(run_validate(&args(files, ReportFormat::Text), &mut out).is_err());
    }
}
