//! Byte-literal rendering.
//!
//! This module turns a byte buffer into a source snippet declaring that data
//! as a literal in one of the [`Format`] targets.
//!
//! ## Output shape
//!
//! Array targets (C/C++, Go bytes, Rust) print `0xHH` elements joined by
//! `", "`, wrapped [`EncoderConfig::items_per_line`] per line, each line
//! indented by [`EncoderConfig::indent`]. Go strings escape every byte as
//! `\xHH`; Python gets the bare hex digest passed to `bytes.fromhex`.
//!
//! ```
//! use bytelit_core::{encode, Format};
//!
//! assert_eq!(
//!     encode(&[0x41, 0x42], Format::Python),
//!     r#"payload = bytes.fromhex("4142")"#
//! );
//! ```
//!
//! Rendering is total: every input, including an empty one, has a literal
//! form in every target. For inputs too large to hold twice in memory, see
//! [`StreamEncoder`].

mod stream;
mod writer;

use crate::error::{Error, Result};
use crate::format::Format;
use crate::{DEFAULT_ITEMS_PER_LINE, DEFAULT_VARIABLE_NAME};
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use tracing::trace;

pub use stream::{StreamEncoder, DEFAULT_CHUNK_SIZE};
pub(crate) use writer::LiteralWriter;

/// Configuration for literal rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Name of the declared variable (default: `payload`)
    pub variable_name: String,
    /// Elements per line for array targets (default: 16)
    pub items_per_line: usize,
    /// Indentation of element lines (default: 4 spaces)
    pub indent: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            variable_name: DEFAULT_VARIABLE_NAME.to_string(),
            items_per_line: DEFAULT_ITEMS_PER_LINE,
            indent: "    ".to_string(),
        }
    }
}

impl EncoderConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the declared variable name
    pub fn variable_name(mut self, name: impl Into<String>) -> Self {
        self.variable_name = name.into();
        self
    }

    /// Sets the number of elements per line
    pub fn items_per_line(mut self, n: usize) -> Self {
        self.items_per_line = n;
        self
    }

    /// Sets the indentation string
    pub fn indent(mut self, s: impl Into<String>) -> Self {
        self.indent = s.into();
        self
    }

    /// Checks that the config renders valid source in every target
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.variable_name) {
            return Err(Error::invalid_identifier(&self.variable_name));
        }
        if self.items_per_line == 0 {
            return Err(Error::invalid_config("items per line must be at least 1"));
        }
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(Error::invalid_config(
                "indent may only contain spaces and tabs",
            ));
        }
        Ok(())
    }
}

/// Words that can't name a variable in at least one target, plus the
/// identifiers the C rendering itself refers to
const RESERVED_WORDS: &[&str] = &[
    // C / C++
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "const", "constexpr", "continue", "decltype", "default", "delete", "do",
    "double", "else", "enum", "explicit", "export", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new",
    "noexcept", "not", "nullptr", "operator", "or", "private", "protected", "public",
    "register", "restrict", "return", "short", "signed", "sizeof", "size_t", "static",
    "struct", "switch", "template", "this", "throw", "true", "try", "typedef", "typename",
    "union", "unsigned", "using", "virtual", "void", "volatile", "while",
    // Go
    "chan", "defer", "fallthrough", "func", "go", "import", "interface", "map", "package",
    "range", "select", "type", "var",
    // Python
    "False", "None", "True", "as", "assert", "async", "await", "def", "del", "elif",
    "except", "finally", "from", "global", "in", "is", "lambda", "nonlocal", "pass",
    "raise", "with", "yield",
    // Rust
    "Self", "abstract", "become", "box", "crate", "dyn", "final", "fn", "impl", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "self", "super", "trait", "typeof", "unsafe", "unsized", "where",
];

/// An identifier accepted by C, Go, Python and Rust alike
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name != "_"
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED_WORDS.contains(&name)
}

/// Renders byte buffers as source literals
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    /// Creates an encoder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with a custom configuration
    pub fn with_config(config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the active configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Render `data` as a `format` literal
    pub fn encode(&self, data: &[u8], format: Format) -> String {
        let mut output = String::with_capacity(self.estimate_len(data.len(), format));
        self.write_to(data, format, &mut output)
            .expect("String write cannot fail");
        output
    }

    /// Write the rendering of `data` to a writer
    pub fn write_to(&self, data: &[u8], format: Format, w: &mut impl FmtWrite) -> std::fmt::Result {
        let mut writer = LiteralWriter::new(&self.config, format);
        writer.begin(w, !data.is_empty())?;
        writer.push(w, data)?;
        writer.finish(w)
    }

    /// Render `data` in every format
    pub fn encode_all(&self, data: &[u8]) -> BTreeMap<Format, String> {
        self.encode_formats(data, &Format::ALL)
    }

    /// Render `data` in the given formats; duplicates are rendered once
    pub fn encode_formats(&self, data: &[u8], formats: &[Format]) -> BTreeMap<Format, String> {
        let mut results = BTreeMap::new();
        for &format in formats {
            if results.contains_key(&format) {
                continue;
            }
            trace!("Rendering {} bytes as {}", data.len(), format);
            results.insert(format, self.encode(data, format));
        }
        results
    }

    /// Render `data` in every format, one rayon task per format.
    ///
    /// The result is identical to [`Encoder::encode_all`].
    #[cfg(feature = "parallel")]
    pub fn encode_all_parallel(&self, data: &[u8]) -> BTreeMap<Format, String> {
        self.encode_formats_parallel(data, &Format::ALL)
    }

    /// Parallel counterpart of [`Encoder::encode_formats`]
    #[cfg(feature = "parallel")]
    pub fn encode_formats_parallel(
        &self,
        data: &[u8],
        formats: &[Format],
    ) -> BTreeMap<Format, String> {
        use rayon::prelude::*;

        let mut unique = formats.to_vec();
        unique.sort();
        unique.dedup();

        unique
            .par_iter()
            .map(|&format| {
                trace!("Rendering {} bytes as {}", data.len(), format);
                (format, self.encode(data, format))
            })
            .collect()
    }

    /// Upper bound on the rendered size, used to presize buffers
    fn estimate_len(&self, len: usize, format: Format) -> usize {
        let name = self.config.variable_name.len();
        let body = match format {
            Format::CCpp | Format::GoBytes | Format::Rust => {
                let lines = len.div_ceil(self.config.items_per_line);
                len * 6 + lines * (self.config.indent.len() + 2)
            }
            Format::GoString => len * 4,
            Format::Python => len * 2,
        };
        body + 3 * name + 64
    }
}

/// Render `data` as a `format` literal with the default configuration
pub fn encode(data: &[u8], format: Format) -> String {
    Encoder::new().encode(data, format)
}

/// Render `data` in every format with the default configuration
pub fn encode_all(data: &[u8]) -> BTreeMap<Format, String> {
    Encoder::new().encode_all(data)
}
