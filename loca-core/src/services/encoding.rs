use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};

#[derive(Debug, Serialize)]
pub struct EncodingDetection {
    pub best: String,
    pub confidence: f32,
    pub has_bom: bool,
}

/// Text decoded from a file along with what was used to decode it.
#[derive(Debug)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
    pub had_errors: bool,
}

/// Reads a text file, honouring a BOM and otherwise guessing the encoding.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| CoreError::read(path, e))?;
    let decoded = decode_bytes(&bytes);

    if decoded.had_errors {
        warn!(path = %path.display(), encoding = decoded.encoding, "lossy decode");
    } else {
        debug!(path = %path.display(), encoding = decoded.encoding, "decoded");
    }

    Ok(decoded.text)
}

pub fn decode_bytes(bytes: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText {
            text: text.into_owned(),
            encoding: encoding.name(),
            had_errors,
        };
    }

    // Plain UTF-8 is by far the common case; skip detection for it.
    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText {
            text: text.to_string(),
            encoding: UTF_8.name(),
            had_errors: false,
        };
    }

    let encoding = guess(bytes);
    let (text, _, had_errors) = encoding.decode(bytes);

    DecodedText {
        text: text.into_owned(),
        encoding: encoding.name(),
        had_errors,
    }
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetection> {
    let bytes = fs::read(path).map_err(|e| CoreError::read(path, e))?;

    if let Some((encoding, _)) = Encoding::for_bom(&bytes) {
        return Ok(EncodingDetection {
            best: encoding.name().to_lowercase(),
            confidence: 0.99,
            has_bom: true,
        });
    }

    let encoding = guess(&bytes);

    Ok(EncodingDetection {
        best: encoding.name().to_lowercase(),
        confidence: estimate_confidence(&bytes, encoding),
        has_bom: false,
    })
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bom_is_stripped() {
        let d = decode_bytes(b"\xEF\xBB\xBF<contentList/>");
        assert_eq!(d.text, "<contentList/>");
        assert_eq!(d.encoding, "UTF-8");
        assert!(!d.had_errors);
    }

    #[test]
    fn utf16le_bom_is_decoded() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "héllo".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let d = decode_bytes(&bytes);
        assert_eq!(d.text, "héllo");
        assert_eq!(d.encoding, "UTF-16LE");
    }

    #[test]
    fn plain_utf8_passes_through() {
        let d = decode_bytes("日本語".as_bytes());
        assert_eq!(d.text, "日本語");
        assert_eq!(d.encoding, "UTF-8");
    }

    #[test]
    fn legacy_single_byte_text_is_decoded() {
        // "café" in windows-1252
        let d = decode_bytes(b"caf\xE9 au lait, tr\xE8s bien");
        assert!(d.text.starts_with("caf"));
        assert!(!d.text.contains('\u{fffd}'));
    }
}
