use std::io::{Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use super::error::{BlobError, BlobResult};

/// Gzip-compress UTF-8 content for the write path (§4.3).
pub fn compress(content: &str, level: u32) -> BlobResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(content.as_bytes())?;
    encoder.finish().map_err(BlobError::Io)
}

/// Gzip-decompress bytes back into a UTF-8 string for the read path (§4.3).
pub fn decompress(bytes: &[u8]) -> BlobResult<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = String::new();
    decoder.read_to_string(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_lossless() {
        let cases = [
            "Hello, World!",
            "",
            "unicode: héllo wörld 日本語 🦀",
            "\x00\x01\x02control bytes\x7f",
        ];
        for content in cases {
            let compressed = compress(content, 6).unwrap();
            let decompressed = decompress(&compressed).unwrap();
            assert_eq!(decompressed, content);
        }
    }

    #[test]
    fn compressed_output_is_smaller_for_repetitive_content() {
        let content = "a".repeat(10_000);
        let compressed = compress(&content, 6).unwrap();
        assert!(compressed.len() < content.len());
    }
}
