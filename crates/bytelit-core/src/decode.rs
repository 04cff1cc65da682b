//! Reading rendered literals back into bytes.
//!
//! This is the inverse of [`crate::encoder`]: given the text of a literal and
//! the format it was rendered in, recover the hex digest or the original
//! bytes. The parser only looks at the literal body between the format's
//! delimiters, so any variable name, indentation or line width is accepted.

use crate::error::{Error, Result};
use crate::format::Format;

/// Opening and closing delimiters of each format's literal body
fn delimiters(format: Format) -> (&'static str, &'static str) {
    match format {
        Format::CCpp => ("[] = {", "}"),
        Format::GoBytes => ("[]byte{", "}"),
        Format::Rust => (": &[u8] = &[", "]"),
        Format::GoString => (" = \"", "\""),
        Format::Python => ("bytes.fromhex(\"", "\")"),
    }
}

/// Slice out the text between the format's delimiters
fn body(text: &str, format: Format) -> Result<&str> {
    let (open, close) = delimiters(format);
    let start = text
        .find(open)
        .ok_or_else(|| Error::invalid_literal(format, format!("missing `{open}`")))?
        + open.len();
    let len = text[start..]
        .find(close)
        .ok_or_else(|| Error::invalid_literal(format, format!("missing closing `{close}`")))?;
    Ok(&text[start..start + len])
}

/// Lowercased two-digit hex pair, or None
fn hex_pair(s: &str) -> Option<String> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(s.to_ascii_lowercase())
    } else {
        None
    }
}

/// Extract the hex digest embedded in a rendered literal
pub fn extract_hex(text: &str, format: Format) -> Result<String> {
    let body = body(text, format)?;
    let mut hex = String::with_capacity(body.len());

    match format {
        Format::CCpp | Format::GoBytes | Format::Rust => {
            for (i, item) in body.split(',').map(str::trim).enumerate() {
                if item.is_empty() {
                    continue;
                }
                let pair = item
                    .strip_prefix("0x")
                    .or_else(|| item.strip_prefix("0X"))
                    .and_then(hex_pair)
                    .ok_or_else(|| {
                        Error::invalid_literal(format, format!("element {i} `{item}` is not 0xHH"))
                    })?;
                hex.push_str(&pair);
            }
        }
        Format::GoString => {
            let mut rest = body;
            while !rest.is_empty() {
                let pair = rest
                    .strip_prefix("\\x")
                    .and_then(|r| r.get(..2))
                    .and_then(hex_pair)
                    .ok_or_else(|| {
                        let offset = body.len() - rest.len();
                        Error::invalid_literal(format, format!("expected \\xHH at offset {offset}"))
                    })?;
                hex.push_str(&pair);
                rest = &rest[4..];
            }
        }
        Format::Python => {
            for c in body.chars().filter(|c| !c.is_ascii_whitespace()) {
                if !c.is_ascii_hexdigit() {
                    return Err(Error::invalid_literal(
                        format,
                        format!("`{c}` is not a hex digit"),
                    ));
                }
                hex.push(c.to_ascii_lowercase());
            }
            if hex.len() % 2 != 0 {
                return Err(Error::invalid_literal(format, "odd number of hex digits"));
            }
        }
    }

    Ok(hex)
}

/// Decode a rendered literal back into the bytes it declares
pub fn decode_literal(text: &str, format: Format) -> Result<Vec<u8>> {
    let hex = extract_hex(text, format)?;
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| Error::invalid_literal(format, "malformed hex digest"))
        })
        .collect()
}

/// Check that `text` declares exactly `data`
pub fn verify_literal(data: &[u8], text: &str, format: Format) -> Result<()> {
    let decoded = decode_literal(text, format)?;
    if decoded == data {
        return Ok(());
    }
    let details = match decoded.iter().zip(data).position(|(a, b)| a != b) {
        Some(offset) => format!(
            "byte {offset} is 0x{:02x}, expected 0x{:02x}",
            decoded[offset], data[offset]
        ),
        None => format!("decoded {} bytes, expected {}", decoded.len(), data.len()),
    };
    Err(Error::verification_failed(format, details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode, Encoder, EncoderConfig};

    #[test]
    fn test_round_trip_every_byte() {
        let data: Vec<u8> = (0..=255).collect();
        for format in Format::ALL {
            let text = encode(&data, format);
            assert_eq!(decode_literal(&text, format).unwrap(), data, "{format}");
        }
    }

    #[test]
    fn test_round_trip_empty() {
        for format in Format::ALL {
            let text = encode(&[], format);
            assert_eq!(extract_hex(&text, format).unwrap(), "");
            assert!(decode_literal(&text, format).unwrap().is_empty());
        }
    }

    #[test]
    fn test_python_digest() {
        let text = encode(&[0x41, 0x42], Format::Python);
        assert_eq!(extract_hex(&text, Format::Python).unwrap(), "4142");
    }

    #[test]
    fn test_custom_layout() {
        let config = EncoderConfig::new().variable_name("x").items_per_line(3).indent("\t");
        let encoder = Encoder::with_config(config).unwrap();
        let data = b"hello world";
        for format in Format::ALL {
            let text = encoder.encode(data, format);
            assert_eq!(decode_literal(&text, format).unwrap(), data);
        }
    }

    #[test]
    fn test_hand_written_literals() {
        assert_eq!(
            decode_literal("static const uint8_t[] = { 0XAB, 0x0c, };", Format::CCpp).unwrap(),
            [0xab, 0x0c]
        );
        assert_eq!(
            decode_literal("x = bytes.fromhex(\"de ad BE EF\")", Format::Python).unwrap(),
            [0xde, 0xad, 0xbe, 0xef]
        );
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            decode_literal("var payload = []byte{ 0x1 }", Format::GoBytes),
            Err(Error::InvalidLiteral { format: Format::GoBytes, .. })
        ));
        assert!(decode_literal(r#"const payload = "\x4""#, Format::GoString).is_err());
        assert!(decode_literal(r#"const payload = "A""#, Format::GoString).is_err());
        assert!(decode_literal(r#"payload = bytes.fromhex("abc")"#, Format::Python).is_err());
        assert!(decode_literal(r#"payload = bytes.fromhex("zz")"#, Format::Python).is_err());
        assert!(decode_literal("let payload: &[u8] = &[0x00", Format::Rust).is_err());
        assert!(decode_literal("nothing here", Format::CCpp).is_err());
    }

    #[test]
    fn test_verify() {
        let text = encode(b"abc", Format::Rust);
        assert!(verify_literal(b"abc", &text, Format::Rust).is_ok());

        let err = verify_literal(b"abd", &text, Format::Rust).unwrap_err();
        assert!(err.to_string().contains("byte 2"));

        let err = verify_literal(b"abcd", &text, Format::Rust).unwrap_err();
        assert!(matches!(err, Error::VerificationFailed { .. }));
    }
}
