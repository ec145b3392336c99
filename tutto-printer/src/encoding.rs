//! Latin text folding and code page encoding for thermal printers
//!
//! Entry-level 58mm printers only render a single-byte code page. This
//! module provides utilities for:
//! - Folding accented Latin text down to its base letters
//! - Calculating printed column widths
//! - Converting UTF-8 to Windows-1252 while preserving ESC/POS commands

use tracing::instrument;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold accented Latin text to the printer's basic character set
///
/// Decomposes every character (NFD) and drops the combining marks, so
/// `"Panadería"` becomes `"Panaderia"` and `"Niño"` becomes `"Nino"`.
/// Folding already folded text is a no-op.
pub fn normalize_text(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Get the printed column width of a string
///
/// Every character occupies one column once folded and encoded to a
/// single-byte code page.
pub fn text_width(s: &str) -> usize {
    normalize_text(s).chars().count()
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to Windows-1252
///
/// ASCII bytes (0x00-0x7F) are kept exactly as is, which protects ESC/POS
/// commands from being corrupted. Only bytes >= 0x80 are treated as UTF-8
/// sequences and re-encoded; characters without a Windows-1252 mapping are
/// replaced by `?`.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len());
    let mut buffer = Vec::new();

    for &b in bytes {
        if b < 0x80 {
            flush_buffer(&mut buffer, &mut result);
            result.push(b);
        } else {
            buffer.push(b);
        }
    }

    flush_buffer(&mut buffer, &mut result);
    result
}

/// Flush the non-ASCII buffer, converting UTF-8 to Windows-1252
fn flush_buffer(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }

    let s = String::from_utf8_lossy(buffer);
    let mut utf8 = [0u8; 4];
    for c in s.chars() {
        let (encoded, _, unmappable) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut utf8));
        if unmappable {
            result.push(b'?');
        } else {
            result.extend_from_slice(&encoded);
        }
    }
    buffer.clear();
}
