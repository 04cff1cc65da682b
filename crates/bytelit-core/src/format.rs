//! Target formats for literal rendering.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Target source syntax for a rendered literal
///
/// Variants are ordered the way renderings are presented, so a
/// `BTreeMap<Format, _>` iterates in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Format {
    /// `unsigned char` array plus a `size_t` length declaration
    CCpp,
    /// Go `[]byte` slice
    GoBytes,
    /// Go string constant with `\xHH` escapes
    GoString,
    /// Python `bytes.fromhex` call
    Python,
    /// Rust `&[u8]` slice
    Rust,
}

impl Format {
    /// Every format, in presentation order
    pub const ALL: [Format; 5] = [
        Format::CCpp,
        Format::GoBytes,
        Format::GoString,
        Format::Python,
        Format::Rust,
    ];

    /// Human readable name, used as the key when presenting renderings
    pub fn display_name(&self) -> &'static str {
        match self {
            Format::CCpp => "C/C++",
            Format::GoBytes => "Go bytes",
            Format::GoString => "Go string",
            Format::Python => "Python",
            Format::Rust => "Rust",
        }
    }

    /// Stable kebab-case key, accepted by [`FromStr`]
    pub fn key(&self) -> &'static str {
        match self {
            Format::CCpp => "c-cpp",
            Format::GoBytes => "go-bytes",
            Format::GoString => "go-string",
            Format::Python => "python",
            Format::Rust => "rust",
        }
    }

    /// File extension for a source file holding this rendering
    pub fn extension(&self) -> &'static str {
        match self {
            Format::CCpp => "c",
            Format::GoBytes | Format::GoString => "go",
            Format::Python => "py",
            Format::Rust => "rs",
        }
    }

    /// Suffix appended to the file stem so that formats sharing an
    /// extension don't collide on disk
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Format::GoBytes => "_bytes",
            Format::GoString => "_string",
            _ => "",
        }
    }

    /// Line comment marker of the target language
    pub fn comment_prefix(&self) -> &'static str {
        match self {
            Format::Python => "#",
            _ => "//",
        }
    }

    /// Returns true for targets rendered as a wrapped element list
    pub fn is_array_style(&self) -> bool {
        matches!(self, Format::CCpp | Format::GoBytes | Format::Rust)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c-cpp" | "c" | "cpp" | "c++" | "c/c++" => Ok(Format::CCpp),
            "go-bytes" | "go" => Ok(Format::GoBytes),
            "go-string" => Ok(Format::GoString),
            "python" | "py" => Ok(Format::Python),
            "rust" | "rs" => Ok(Format::Rust),
            _ => Err(Error::unknown_format(s)),
        }
    }
}
