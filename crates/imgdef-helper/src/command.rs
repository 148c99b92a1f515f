//! # Command Execution
//!
//! Runs external programs and collects their combined stdout and stderr.
//! With live output enabled every chunk is also written to this process's
//! stdout as soon as it arrives, so long-running build steps stay visible
//! while their output is still recorded for error reports.

use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::error::HelperError;

/// Render a command as `program arg1 arg2` for logs and error messages.
pub fn command_line(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program` with `args`, returning everything it printed.
///
/// # Errors
///
/// [`HelperError::Spawn`] when the program cannot be started and
/// [`HelperError::CommandFailed`] (carrying the captured output) when it
/// exits unsuccessfully.
pub fn run_command<I, S>(program: &str, args: I, live: bool) -> Result<String, HelperError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    run(&mut cmd, live)
}

/// Like [`run_command`] for a prepared [`Command`].
///
/// The command's stdin is closed and both output streams are replaced.
pub fn run(cmd: &mut Command, live: bool) -> Result<String, HelperError> {
    let command = command_line(cmd);
    tracing::info!(%command, live, "running command");

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| HelperError::Spawn {
            command: command.clone(),
            source,
        })?;

    let sink = Mutex::new(Vec::new());
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let shared = &sink;
    let status = thread::scope(|scope| -> io::Result<_> {
        let readers = [
            stdout.map(|stream| scope.spawn(move || tee(stream, shared, live))),
            stderr.map(|stream| scope.spawn(move || tee(stream, shared, live))),
        ];
        let status = child.wait()?;
        for reader in readers.into_iter().flatten() {
            reader
                .join()
                .map_err(|_| io::Error::other("output reader panicked"))??;
        }
        Ok(status)
    })?;

    let buffer = sink.into_inner().unwrap_or_else(PoisonError::into_inner);
    let output = String::from_utf8_lossy(&buffer).into_owned();

    if status.success() {
        Ok(output)
    } else {
        tracing::debug!(%command, %status, "command failed");
        Err(HelperError::CommandFailed {
            command,
            status,
            output,
        })
    }
}

fn tee(mut stream: impl Read, sink: &Mutex<Vec<u8>>, live: bool) -> io::Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let mut buffer = sink.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.extend_from_slice(&chunk[..n]);
        if live {
            let mut out = io::stdout().lock();
            out.write_all(&chunk[..n])?;
            out.flush()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_both_streams() {
        let output = run_command("sh", ["-c", "echo out; echo err >&2"], false).unwrap();
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
    }

    #[test]
    fn failure_carries_output_and_status() {
        let err = run_command("sh", ["-c", "echo partial; exit 3"], false).unwrap_err();
        match &err {
            HelperError::CommandFailed {
                command,
                status,
                output,
            } => {
                assert_eq!(command, "sh -c echo partial; exit 3");
                assert_eq!(status.code(), Some(3));
                assert_eq!(output, "partial\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err
            .to_string()
            .starts_with("Command \"sh -c echo partial; exit 3\" returned with"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run_command("imgdef-no-such-program", ["x"], false).unwrap_err();
        assert!(matches!(err, HelperError::Spawn { ref command, .. } if command == "imgdef-no-such-program x"));
    }

    #[test]
    fn command_line_joins_program_and_args() {
        let mut cmd = Command::new("dd");
        cmd.args(["if=a", "of=b"]);
        assert_eq!(command_line(&cmd), "dd if=a of=b");
    }
}
