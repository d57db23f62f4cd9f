//! Text decoding for pages and stylesheets read from disk.

use std::borrow::Cow;

/// How far into a document to look for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset>` or `@charset`)
/// 3. Falls back to Windows-1252 (what browsers assume for legacy pages)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Decode an HTML page, honoring its `<meta charset>` declaration.
pub fn decode_page(bytes: &[u8]) -> String {
    decode_text(bytes, extract_charset(bytes)).into_owned()
}

/// Decode a stylesheet, honoring a leading `@charset` rule.
pub fn decode_stylesheet(bytes: &[u8]) -> String {
    let hint = bytes
        .starts_with(b"@charset")
        .then(|| extract_charset_value(&bytes[b"@charset".len()..]))
        .flatten();
    decode_text(bytes, hint).into_owned()
}

/// Find a `charset=` declaration near the start of a page.
///
/// Covers both `<meta charset="...">` and
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`.
pub fn extract_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(SNIFF_LEN)];
    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    extract_charset_value(&prefix[pos + 8..])
}

fn extract_charset_value(bytes: &[u8]) -> Option<&str> {
    let bytes = match bytes.iter().position(|b| !b.is_ascii_whitespace()) {
        Some(start) => &bytes[start..],
        None => return None,
    };
    let (bytes, terminators): (&[u8], &[u8]) = match bytes.first() {
        Some(b'"') => (&bytes[1..], b"\"".as_slice()),
        Some(b'\'') => (&bytes[1..], b"'".as_slice()),
        _ => (bytes, b" \t\r\n;>/\"'".as_slice()),
    };

    let end = bytes
        .iter()
        .position(|b| terminators.contains(b))
        .unwrap_or(bytes.len());
    let value = std::str::from_utf8(&bytes[..end]).ok()?.trim();
    (!value.is_empty()).then_some(value)
}
