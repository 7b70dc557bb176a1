//! Character-set aware text loading.
//!
//! Object files come from many editors, so the encoding is sniffed from a
//! byte-order mark first, then from the XML declaration, falling back to UTF-8.

use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{DocError, DocResult};

/// Read a file and decode it with [`decode_text`].
pub fn read_text(path: &Path) -> DocResult<String> {
    let bytes = std::fs::read(path)?;
    decode_text(&bytes)
}

/// Decode raw bytes into text, detecting the character set.
pub fn decode_text(bytes: &[u8]) -> DocResult<String> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| declared_encoding(bytes))
        .unwrap_or(UTF_8);
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DocError::Decode {
            encoding: actual.name(),
        });
    }
    Ok(text.into_owned())
}

/// Encoding named by `<?xml ... encoding="..."?>`, if any.
///
/// A declaration readable as ASCII cannot be UTF-16, so such labels are ignored.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(512)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = &head[..end];
    let at = decl.windows(8).position(|w| w == b"encoding")?;

    let rest = decl[at + 8..].trim_ascii_start();
    let rest = rest.strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = rest.iter().position(|&b| b == quote)?;

    Encoding::for_label(&rest[..len]).filter(|&enc| enc != UTF_16LE && enc != UTF_16BE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn plain_utf8_without_declaration() {
        assert_eq!(decode_text("<a>é</a>".as_bytes()).unwrap(), "<a>é</a>");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<a/>");
        assert_eq!(decode_text(&bytes).unwrap(), "<a/>");
    }

    #[test]
    fn utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a>ж</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_text(&bytes).unwrap(), "<a>ж</a>");
    }

    #[test]
    fn declared_single_byte_encoding() {
        let mut bytes = b"<?xml version=\"1.0\" encoding='windows-1251'?><a>".to_vec();
        // "Привет" in windows-1251
        bytes.extend_from_slice(&[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);
        bytes.extend_from_slice(b"</a>");
        let text = decode_text(&bytes).unwrap();
        assert!(text.ends_with("<a>Привет</a>"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = decode_text(&[b'<', b'a', b'>', 0xFF, 0xFE, 0xFD]).unwrap_err();
        assert!(matches!(err, DocError::Decode { encoding: "UTF-8" }));
    }

    #[test]
    fn read_text_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<?xml version=\"1.0\" encoding=\"utf-8\"?><a>1</a>")
            .unwrap();
        let text = read_text(file.path()).unwrap();
        assert!(text.ends_with("<a>1</a>"));
    }
}
