//! # Standard Stream Capture
//!
//! Redirects this process's stdout or stderr into a pipe so that output
//! written by library code or by child processes inheriting the stream can
//! be inspected. Redirection works at the file descriptor level; a reader
//! thread drains the pipe so writers never block on a full buffer.
//!
//! [`StreamCapture::restore`] may be called any number of times; only the
//! first call has an effect. Dropping an active capture restores the
//! stream. Child processes still holding the redirected descriptor keep
//! [`StreamCapture::finish`] waiting until they exit.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, OwnedFd, RawFd};
use std::thread::{self, JoinHandle};

use nix::unistd::{dup2, pipe};

use crate::error::HelperError;

/// Which standard stream to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl StdStream {
    pub fn name(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }

    fn raw_fd(self) -> RawFd {
        match self {
            Self::Stdout => io::stdout().as_raw_fd(),
            Self::Stderr => io::stderr().as_raw_fd(),
        }
    }

    fn duplicate(self) -> io::Result<OwnedFd> {
        match self {
            Self::Stdout => io::stdout().as_fd().try_clone_to_owned(),
            Self::Stderr => io::stderr().as_fd().try_clone_to_owned(),
        }
    }

    fn flush(self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().flush(),
            Self::Stderr => io::stderr().flush(),
        }
    }

    fn redirect(self, source: RawFd) -> Result<(), HelperError> {
        dup2(source, self.raw_fd())
            .map(drop)
            .map_err(|source| HelperError::Redirect {
                stream: self.name(),
                source,
            })
    }
}

/// An active redirection of one standard stream.
#[derive(Debug)]
pub struct StreamCapture {
    stream: StdStream,
    saved: Option<OwnedFd>,
    reader: Option<JoinHandle<io::Result<Vec<u8>>>>,
}

impl StreamCapture {
    /// Start capturing `stream`.
    pub fn begin(stream: StdStream) -> Result<Self, HelperError> {
        stream.flush()?;
        let saved = stream.duplicate()?;
        let (read_end, write_end) = pipe().map_err(|source| HelperError::Redirect {
            stream: stream.name(),
            source,
        })?;
        stream.redirect(write_end.as_raw_fd())?;
        drop(write_end);

        let reader = thread::spawn(move || {
            let mut captured = Vec::new();
            File::from(read_end).read_to_end(&mut captured)?;
            Ok(captured)
        });

        tracing::trace!(stream = stream.name(), "capture started");
        Ok(Self {
            stream,
            saved: Some(saved),
            reader: Some(reader),
        })
    }

    pub fn stream(&self) -> StdStream {
        self.stream
    }

    /// Whether the stream is still redirected.
    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }

    /// Point the stream back at its original destination.
    pub fn restore(&mut self) -> Result<(), HelperError> {
        let Some(saved) = self.saved.take() else {
            return Ok(());
        };
        self.stream.flush()?;
        self.stream.redirect(saved.as_raw_fd())?;
        tracing::trace!(stream = self.stream.name(), "capture restored");
        Ok(())
    }

    /// Restore the stream and return everything written while captured.
    pub fn finish(mut self) -> Result<String, HelperError> {
        self.restore()?;
        let captured = match self.reader.take() {
            Some(reader) => reader
                .join()
                .map_err(|_| io::Error::other("capture reader panicked"))??,
            None => Vec::new(),
        };
        Ok(String::from_utf8_lossy(&captured).into_owned())
    }
}

impl Drop for StreamCapture {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(stream = self.stream.name(), %err, "failed to restore stream");
        }
    }
}
