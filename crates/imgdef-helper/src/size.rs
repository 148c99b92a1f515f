//! # Sizes
//!
//! Byte quantities as reported by disk tools, and directory measurement
//! through `du`.

use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use crate::error::HelperError;

/// A non-negative number of bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Size(u64);

impl Size {
    pub const ZERO: Size = Size(0);

    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// `self - other`, or zero when `other` is larger.
    pub const fn saturating_sub(self, other: Size) -> Size {
        Size(self.0.saturating_sub(other.0))
    }

    /// Parse a byte count with an optional binary unit suffix
    /// (`B`, `K`, `M`, `G`, `T`, `P`, `E`).
    pub fn parse(input: &str) -> Result<Self, HelperError> {
        let err = |reason: &str| HelperError::ParseSize {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, unit) = trimmed.split_at(split);
        if digits.is_empty() {
            return Err(err("expected a number"));
        }

        let shift = match unit {
            "" | "B" => 0,
            "K" => 10,
            "M" => 20,
            "G" => 30,
            "T" => 40,
            "P" => 50,
            "E" => 60,
            _ => return Err(err("unknown unit")),
        };

        let value: u64 = digits.parse().map_err(|_| err("number out of range"))?;
        value
            .checked_mul(1u64 << shift)
            .map(Size)
            .ok_or_else(|| err("number out of range"))
    }
}

impl From<u64> for Size {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

impl FromStr for Size {
    type Err = HelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Apparent disk usage of `path` in bytes, via `du -s -B1`.
pub fn measure_directory_size(path: impl AsRef<Path>) -> Result<Size, HelperError> {
    let path = path.as_ref();
    let failure = |reason: String| HelperError::DiskUsage {
        path: path.display().to_string(),
        reason,
    };

    let output = Command::new("du")
        .args(["-s", "-B1"])
        .arg(path)
        .output()
        .map_err(|e| failure(e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(failure(format!("{}: {}", output.status, stderr.trim())));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let field = stdout.split('\t').next().unwrap_or_default();
    let size = Size::parse(field)?;
    tracing::debug!(path = %path.display(), bytes = size.bytes(), "measured directory");
    Ok(size)
}
