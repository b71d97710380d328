use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::application::errors::ClassifyError;

/// How far into the payload a data-URI comma is looked for
const DATA_URI_SCAN_LIMIT: usize = 100;

/// Decodes caller-supplied base64 image text.
///
/// Accepts a `data:<mime>;base64,` prefix, embedded whitespace and missing
/// `=` padding.
pub(crate) fn decode_image(encoded: &str) -> Result<Vec<u8>, ClassifyError> {
    let mut payload = encoded.trim();
    if let Some(comma) = payload.find(',').filter(|&i| i < DATA_URI_SCAN_LIMIT) {
        payload = &payload[comma + 1..];
    }

    let mut cleaned: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    while cleaned.len() % 4 != 0 {
        cleaned.push('=');
    }

    let bytes = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| ClassifyError::invalid_input(format!("image is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(ClassifyError::invalid_input("image is empty"));
    }
    Ok(bytes)
}

/// MIME type from magic bytes, `image/jpeg` when unrecognised.
pub(crate) fn sniff_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}
