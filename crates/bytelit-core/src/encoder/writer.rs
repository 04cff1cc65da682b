//! Per-format literal skeletons.
//!
//! [`LiteralWriter`] knows how each target opens, separates, and closes a
//! literal. It tracks how many bytes it has emitted so that the element list
//! can be fed in arbitrary pieces and still wrap at the same positions as a
//! single call over the whole buffer.

use super::EncoderConfig;
use crate::format::Format;
use std::fmt::{Result, Write};

pub(crate) struct LiteralWriter<'a> {
    config: &'a EncoderConfig,
    format: Format,
    written: usize,
}

impl<'a> LiteralWriter<'a> {
    pub(crate) fn new(config: &'a EncoderConfig, format: Format) -> Self {
        Self {
            config,
            format,
            written: 0,
        }
    }

    /// Write the declaration up to the first element.
    ///
    /// Array targets with no elements collapse to bare delimiters, so the
    /// caller has to say up front whether any bytes will follow.
    pub(crate) fn begin(&mut self, w: &mut impl Write, has_data: bool) -> Result {
        let name = &self.config.variable_name;
        match self.format {
            Format::CCpp => write!(w, "unsigned char {name}[] = {{")?,
            Format::GoBytes => write!(w, "var {name} = []byte{{")?,
            Format::Rust => write!(w, "let {name}: &[u8] = &[")?,
            Format::GoString => write!(w, "const {name} = \"")?,
            Format::Python => write!(w, "{name} = bytes.fromhex(\"")?,
        }
        if has_data && self.format.is_array_style() {
            write!(w, "\n{}", self.config.indent)?;
        }
        Ok(())
    }

    /// Append elements for the next run of bytes
    pub(crate) fn push(&mut self, w: &mut impl Write, data: &[u8]) -> Result {
        match self.format {
            Format::CCpp | Format::GoBytes | Format::Rust => {
                let per_line = self.config.items_per_line;
                for b in data {
                    if self.written > 0 {
                        if self.written % per_line == 0 {
                            write!(w, ",\n{}", self.config.indent)?;
                        } else {
                            w.write_str(", ")?;
                        }
                    }
                    write!(w, "0x{b:02x}")?;
                    self.written += 1;
                }
            }
            Format::GoString => {
                escape(data, w)?;
                self.written += data.len();
            }
            Format::Python => {
                for b in data {
                    write!(w, "{b:02x}")?;
                }
                self.written += data.len();
            }
        }
        Ok(())
    }

    /// Close the literal and write any trailing declarations
    pub(crate) fn finish(&mut self, w: &mut impl Write) -> Result {
        let open_block = self.written > 0 && self.format.is_array_style();
        if open_block {
            w.write_char('\n')?;
        }
        match self.format {
            Format::CCpp => {
                let name = &self.config.variable_name;
                write!(w, "}};\n\nsize_t {name}_size = sizeof({name});")
            }
            Format::GoBytes => w.write_char('}'),
            Format::Rust => w.write_str("];"),
            Format::GoString => w.write_char('"'),
            Format::Python => w.write_str("\")"),
        }
    }
}

/// Escape every byte as `\xHH`
pub(crate) fn escape(data: &[u8], out: &mut impl Write) -> Result {
    for b in data {
        write!(out, "\\x{b:02x}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render_in_pieces(format: Format, data: &[u8], piece: usize) -> String {
        let config = EncoderConfig::default();
        let mut writer = LiteralWriter::new(&config, format);
        let mut out = String::new();
        writer.begin(&mut out, !data.is_empty()).unwrap();
        for chunk in data.chunks(piece) {
            writer.push(&mut out, chunk).unwrap();
        }
        writer.finish(&mut out).unwrap();
        out
    }

    #[test]
    fn test_escape() {
        let mut out = String::new();
        escape(&[0x00, 0x7f, 0xff], &mut out).unwrap();
        assert_eq!(out, "\\x00\\x7f\\xff");
    }

    #[test]
    fn test_pieces_wrap_like_whole_buffer() {
        let data: Vec<u8> = (0..=40).collect();
        let whole = render_in_pieces(Format::Rust, &data, data.len());
        for piece in [1, 3, 7, 16, 17] {
            assert_eq!(render_in_pieces(Format::Rust, &data, piece), whole);
        }
    }

    #[test]
    fn test_empty_array_collapses() {
        assert_eq!(render_in_pieces(Format::GoBytes, &[], 1), "var payload = []byte{}");
    }
}
