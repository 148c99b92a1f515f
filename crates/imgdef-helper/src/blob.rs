//! Raw blob copies with `dd`.

use std::ffi::OsStr;
use std::process::Command;

use crate::command::command_line;
use crate::error::HelperError;

/// Run `dd` with the given operands (`if=...`, `of=...`, `seek=...`).
///
/// The failure message names the full command line.
pub fn copy_blob<I, S>(operands: I) -> Result<(), HelperError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new("dd");
    cmd.args(operands);
    let command = command_line(&cmd);

    let output = cmd.output().map_err(|source| HelperError::Spawn {
        command: command.clone(),
        source,
    })?;
    if !output.status.success() {
        return Err(HelperError::CommandFailed {
            command,
            status: output.status,
            output: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    tracing::debug!(%command, "copied blob");
    Ok(())
}
