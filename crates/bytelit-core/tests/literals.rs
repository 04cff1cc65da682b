use bytelit_core::{
    decode_literal, encode, encode_all, extract_hex, read_input, ConversionCache, Encoder,
    Format, StreamEncoder,
};
use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::Write;

fn sample(len: usize) -> Vec<u8> {
    // xorshift so the data isn't a plain ramp
    let mut state = 0x2545_f491u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

#[test]
fn c_cpp_scenario() {
    assert_eq!(
        encode(&[0x00, 0x01, 0xff], Format::CCpp),
        "unsigned char payload[] = {\n    0x00, 0x01, 0xff\n};\n\nsize_t payload_size = sizeof(payload);"
    );
}

#[test]
fn go_string_scenario() {
    assert_eq!(encode(&[0x41, 0x42], Format::GoString), r#"const payload = "\x41\x42""#);
}

#[test]
fn python_scenario() {
    assert_eq!(encode(&[0x41, 0x42], Format::Python), r#"payload = bytes.fromhex("4142")"#);
}

#[test]
fn encode_all_covers_every_format_in_order() {
    let all = encode_all(b"bytes");
    assert_eq!(all.keys().copied().collect::<Vec<_>>(), Format::ALL);
    for (format, text) in &all {
        assert_eq!(text, &encode(b"bytes", *format));
    }
}

#[test]
fn round_trip_through_text() {
    for len in [1, 16, 17, 255, 1024, 4097] {
        let data = sample(len);
        for (format, text) in encode_all(&data) {
            assert_eq!(decode_literal(&text, format).unwrap(), data, "{format} / {len}");
        }
    }
}

#[test]
fn python_hex_is_the_full_digest() {
    let data = sample(300);
    let text = encode(&data, Format::Python);
    let hex = extract_hex(&text, Format::Python).unwrap();
    let expected: String = data.iter().map(|b| format!("{b:02x}")).collect();
    assert_eq!(hex, expected);
}

#[test]
fn array_lines_hold_sixteen_elements() {
    let data = sample(16 * 7 + 5);
    for format in [Format::CCpp, Format::GoBytes, Format::Rust] {
        let text = encode(&data, format);
        let rows: Vec<usize> = text
            .lines()
            .filter(|l| l.trim_start().starts_with("0x"))
            .map(|l| l.matches("0x").count())
            .collect();
        assert_eq!(rows.len(), 8);
        let (last, full) = rows.split_last().unwrap();
        assert!(full.iter().all(|&n| n == 16));
        assert_eq!(*last, 5);
    }
}

#[test]
fn stream_from_file_matches_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    let data = sample(10_000);
    File::create(&path).unwrap().write_all(&data).unwrap();

    let loaded = read_input(&path).unwrap();
    assert_eq!(loaded, data);

    let encoder = Encoder::new();
    for format in Format::ALL {
        let mut out = Vec::new();
        let consumed = StreamEncoder::new(&encoder, format)
            .chunk_size(999)
            .write_stream(File::open(&path).unwrap(), &mut out)
            .unwrap();
        assert_eq!(consumed, data.len() as u64);
        assert_eq!(String::from_utf8(out).unwrap(), encoder.encode(&data, format));
    }
}

#[test]
fn cache_serves_the_same_text() {
    let data = sample(64);
    let mut cache = ConversionCache::default();
    let expected = encode_all(&data);
    assert_eq!(cache.populate(&data), &expected);
    assert_eq!(cache.get_or_encode(&data, Format::GoBytes), expected[&Format::GoBytes]);
    assert_eq!(cache.stats().hits, 1);
}
