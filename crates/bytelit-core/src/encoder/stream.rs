//! Incremental rendering for large inputs.

use super::{Encoder, LiteralWriter};
use crate::error::Result;
use crate::format::Format;
use std::io::{ErrorKind, Read, Write};
use tracing::{debug, trace};

/// Default number of input bytes rendered per step (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Renders a literal from a reader to a writer one chunk at a time.
///
/// Neither the input nor the rendered text is held in memory as a whole.
/// The output is byte-identical to [`Encoder::encode`] over the same bytes.
///
/// ```
/// use bytelit_core::{Encoder, Format, StreamEncoder};
///
/// let encoder = Encoder::new();
/// let mut out = Vec::new();
/// StreamEncoder::new(&encoder, Format::GoString)
///     .write_stream(&b"AB"[..], &mut out)?;
/// assert_eq!(out, br#"const payload = "\x41\x42""#);
/// # Ok::<(), bytelit_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct StreamEncoder<'a> {
    encoder: &'a Encoder,
    format: Format,
    chunk_size: usize,
}

impl<'a> StreamEncoder<'a> {
    /// Creates a stream encoder rendering `format` with `encoder`'s settings
    pub fn new(encoder: &'a Encoder, format: Format) -> Self {
        Self {
            encoder,
            format,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets how many input bytes are rendered per step (minimum 1)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Read `reader` to the end and write the rendering to `writer`.
    ///
    /// Returns the number of input bytes consumed.
    pub fn write_stream<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> Result<u64> {
        let mut input = vec![0u8; self.chunk_size];
        let mut text = String::new();
        let mut literal = LiteralWriter::new(self.encoder.config(), self.format);
        let mut total = 0u64;

        let mut filled = read_full(&mut reader, &mut input)?;
        literal
            .begin(&mut text, filled > 0)
            .expect("String write cannot fail");

        while filled > 0 {
            literal
                .push(&mut text, &input[..filled])
                .expect("String write cannot fail");
            writer.write_all(text.as_bytes())?;
            text.clear();

            total += filled as u64;
            trace!("Rendered {} bytes so far as {}", total, self.format);
            filled = read_full(&mut reader, &mut input)?;
        }

        literal.finish(&mut text).expect("String write cannot fail");
        writer.write_all(text.as_bytes())?;
        writer.flush()?;

        debug!("Streamed {} bytes as {}", total, self.format);
        Ok(total)
    }
}

/// Fill `buf` from `reader`, stopping early only at end of input
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncoderConfig;
    use pretty_assertions::assert_eq;

    /// Yields at most `step` bytes per read, like a pipe
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn stream(encoder: &Encoder, format: Format, data: &[u8], chunk: usize) -> String {
        let mut out = Vec::new();
        let consumed = StreamEncoder::new(encoder, format)
            .chunk_size(chunk)
            .write_stream(data, &mut out)
            .unwrap();
        assert_eq!(consumed, data.len() as u64);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_stream_matches_in_memory() {
        let encoder = Encoder::new();
        for len in [0usize, 1, 15, 16, 17, 33, 1000] {
            let data: Vec<u8> = (0..=255).cycle().take(len).collect();
            for format in Format::ALL {
                let expected = encoder.encode(&data, format);
                for chunk in [1, 5, 16, 64, 4096] {
                    assert_eq!(stream(&encoder, format, &data, chunk), expected);
                }
            }
        }
    }

    #[test]
    fn test_stream_with_custom_config() {
        let config = EncoderConfig::new().variable_name("fw").items_per_line(3);
        let encoder = Encoder::with_config(config).unwrap();
        let data = [9u8; 10];
        assert_eq!(
            stream(&encoder, Format::GoBytes, &data, 4),
            encoder.encode(&data, Format::GoBytes)
        );
    }

    #[test]
    fn test_short_reads() {
        let encoder = Encoder::new();
        let data: Vec<u8> = (0..100).collect();
        let mut out = Vec::new();
        StreamEncoder::new(&encoder, Format::Rust)
            .chunk_size(32)
            .write_stream(Trickle { data: &data, step: 7 }, &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), encoder.encode(&data, Format::Rust));
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let encoder = Encoder::new();
        assert_eq!(stream(&encoder, Format::Python, b"hi", 0), encoder.encode(b"hi", Format::Python));
    }
}
