//! String-level path semantics for POSIX and Windows conventions
//!
//! Everything here works on plain strings and never touches the filesystem,
//! so either convention can be applied regardless of the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of raw block devices on POSIX hosts
pub const POSIX_DEVICE_PREFIX: &str = "/dev/";

/// Prefix of the Win32 device namespace (`\\.\PhysicalDrive0`)
pub const WINDOWS_DEVICE_PREFIX: &str = r"\\.\";

/// Which platform's absoluteness and separator rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// `/` separator, absolute when rooted at `/`
    Posix,
    /// `\` or `/` separators, absolute when rooted or drive-qualified (`C:\`)
    Windows,
}

impl PathStyle {
    /// Convention of the platform this binary was built for
    pub const fn host() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    pub fn is_separator(self, c: char) -> bool {
        match self {
            PathStyle::Posix => c == '/',
            PathStyle::Windows => c == '/' || c == '\\',
        }
    }

    /// Absoluteness test for this convention
    pub fn is_absolute(self, path: &str) -> bool {
        let mut chars = path.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if self.is_separator(first) {
            return true;
        }
        match self {
            PathStyle::Posix => false,
            PathStyle::Windows => {
                has_drive_prefix(path) && chars.nth(1).is_some_and(|c| self.is_separator(c))
            }
        }
    }

    /// Final path segment, ignoring trailing separators.
    ///
    /// A path made only of separators (or a bare drive root such as `C:\`)
    /// yields the empty string; a string without separators is returned as is.
    pub fn basename(self, path: &str) -> &str {
        let body = match self {
            PathStyle::Windows if has_drive_prefix(path) => &path[2..],
            _ => path,
        };
        let trimmed = body.trim_end_matches(|c| self.is_separator(c));
        match trimmed.rfind(|c| self.is_separator(c)) {
            Some(pos) => &trimmed[pos + 1..],
            None => trimmed,
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        PathStyle::host()
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStyle::Posix => write!(f, "posix"),
            PathStyle::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for PathStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "posix" | "unix" => Ok(PathStyle::Posix),
            "windows" | "win32" => Ok(PathStyle::Windows),
            "host" => Ok(PathStyle::host()),
            other => Err(format!(
                "unknown path style '{other}', expected posix, windows or host"
            )),
        }
    }
}

/// `X:` drive designator at the start of a Windows path
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Raw device identifiers look absolute but are not filesystem paths
pub fn is_device_path(path: &str) -> bool {
    path.starts_with(POSIX_DEVICE_PREFIX) || path.starts_with(WINDOWS_DEVICE_PREFIX)
}
