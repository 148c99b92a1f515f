//! # imgdef-helper: Build Step Helpers
//!
//! Small process-level utilities used around image builds:
//!
//! - [`run_command`]: run a program, capture combined output, optionally
//!   mirror it live.
//! - [`measure_directory_size`] and [`Size`]: disk usage via `du`, with
//!   underflow-safe subtraction.
//! - [`copy_blob`]: raw copies with `dd`.
//! - [`run_script`]: hook scripts inheriting environment and streams.
//! - [`StreamCapture`]: redirect stdout or stderr into memory.
//! - [`CwdGuard`]: return to the starting directory.
//!
//! Unix only. Each helper logs through `tracing` and fails with a
//! [`HelperError`] whose message names the command or path involved.

pub mod blob;
pub mod capture;
pub mod command;
pub mod cwd;
pub mod error;
pub mod hook;
pub mod size;

pub use blob::copy_blob;
pub use capture::{StdStream, StreamCapture};
pub use command::{command_line, run, run_command};
pub use cwd::CwdGuard;
pub use error::HelperError;
pub use hook::run_script;
pub use size::{measure_directory_size, Size};
