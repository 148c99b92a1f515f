//! Hook scripts run during image builds.

use std::path::Path;
use std::process::Command;

use crate::error::HelperError;

/// Execute the hook at `path`.
///
/// The script inherits this process's environment and standard streams.
pub fn run_script(path: impl AsRef<Path>) -> Result<(), HelperError> {
    let path = path.as_ref();
    let failure = |reason: String| HelperError::HookScript {
        path: path.display().to_string(),
        reason,
    };

    tracing::info!(script = %path.display(), "running hook script");
    let status = Command::new(path)
        .status()
        .map_err(|e| failure(e.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(failure(status.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn successful_hook_runs() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let script = write_script(dir.path(), "ok.sh", &format!("touch {}", marker.display()));
        run_script(&script).unwrap();
        assert!(marker.exists());
    }

    #[test]
    fn failing_hook_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fail.sh", "exit 1");
        let err = run_script(&script).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Error running hook script {}: exit status: 1", script.display())
        );
    }

    #[test]
    fn missing_hook_is_reported() {
        let err = run_script("/nonexistent/hook.sh").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Error running hook script /nonexistent/hook.sh: "));
    }
}
