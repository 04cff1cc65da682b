//! # bytelit-core
//!
//! A library for rendering arbitrary binary data as source-code literals.
//!
//! This crate provides the core functionality for:
//! - Rendering a byte buffer as a C/C++, Go, Python or Rust declaration
//! - Rendering very large inputs incrementally from a reader
//! - Caching renderings of one input across formats
//! - Decoding rendered literals back into bytes
//!
//! ## Architecture
//!
//! - [`format`]: The set of target formats
//! - [`encoder`]: Literal rendering, in memory and streaming
//! - [`cache`]: Caller-owned cache of renderings
//! - [`decode`]: Literal parsing for round-trip verification
//! - [`input`]: Reading input files
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use bytelit_core::{encode, encode_all, Format};
//!
//! let data = [0x00, 0x01, 0xff];
//! assert_eq!(
//!     encode(&data, Format::CCpp),
//!     "unsigned char payload[] = {\n    0x00, 0x01, 0xff\n};\n\nsize_t payload_size = sizeof(payload);"
//! );
//!
//! for (format, text) in encode_all(&data) {
//!     println!("// {format}\n{text}\n");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod cache;
pub mod decode;
pub mod encoder;
pub mod error;
pub mod format;
pub mod input;

// Re-export primary types for convenience
pub use cache::{CacheStats, ConversionCache};
pub use decode::{decode_literal, extract_hex, verify_literal};
pub use encoder::{encode, encode_all, Encoder, EncoderConfig, StreamEncoder};
pub use error::{Error, Result};
pub use format::Format;
pub use input::{read_input, read_nonempty, InputLoader, MAX_INPUT_SIZE};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the declared variable unless configured otherwise
pub const DEFAULT_VARIABLE_NAME: &str = "payload";

/// Elements per line in array targets unless configured otherwise
pub const DEFAULT_ITEMS_PER_LINE: usize = 16;
