//! Result token codec
//!
//! `encode` turns a [`GenerationResult`] into a compact XML document, compresses it with
//! gzip at the fastest level, and hex-encodes the bytes (two lowercase digits per byte).
//! `decode` reverses the pipeline and collapses every failure to `None`.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::ProtocolError;
use crate::result::GenerationResult;

const ROOT_ELEMENT: &str = "GenerationResult";
const CODE_FILES_ELEMENT: &str = "GeneratedCodeFiles";
const PLAIN_FILES_ELEMENT: &str = "GeneratedPlainFiles";
const PATHS_ELEMENT: &str = "GeneratedPaths";
const ITEM_ELEMENT: &str = "item";

/// Encode a result into a line-safe token.
///
/// # Errors
///
/// Returns [`ProtocolError::UnrepresentableText`] when an entry contains a character
/// that XML 1.0 cannot carry (C0 controls other than tab, newline and carriage return,
/// `U+FFFE`, `U+FFFF`). Such a value would not survive a round trip.
pub fn encode(result: &GenerationResult) -> Result<String, ProtocolError> {
    let document = to_document(result)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(&document)?;
    let compressed = encoder.finish()?;

    Ok(hex::encode(compressed))
}

/// Decode a token produced by [`encode`].
///
/// Returns `None` for blank input, malformed hex, a corrupt gzip stream, text that is
/// not an XML document, or a document without a root element. Unknown groups under the
/// root are ignored and a missing group decodes as an empty sequence.
#[must_use]
pub fn decode(token: &str) -> Option<GenerationResult> {
    if token.trim().is_empty() {
        return None;
    }

    let compressed = hex::decode(token).ok()?;

    let mut document = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut document)
        .ok()?;

    if document.trim().is_empty() {
        return None;
    }

    from_document(&document)
}

fn groups(result: &GenerationResult) -> [(&'static str, &[String]); 3] {
    [
        (CODE_FILES_ELEMENT, &result.generated_code_files),
        (PLAIN_FILES_ELEMENT, &result.generated_plain_files),
        (PATHS_ELEMENT, &result.generated_paths),
    ]
}

fn to_document(result: &GenerationResult) -> Result<Vec<u8>, ProtocolError> {
    let mut document = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    document.push_str(&format!("<{ROOT_ELEMENT}>"));

    for (name, items) in groups(result) {
        document.push_str(&format!("<{name}>"));
        for item in items {
            document.push_str(&format!("<{ITEM_ELEMENT}>{}</{ITEM_ELEMENT}>", escape_text(item)?));
        }
        document.push_str(&format!("</{name}>"));
    }

    document.push_str(&format!("</{ROOT_ELEMENT}>"));

    Ok(document.into_bytes())
}

/// Escape text content. Carriage returns are written as character references because
/// XML parsers normalize literal line endings.
fn escape_text(raw: &str) -> Result<String, ProtocolError> {
    let mut escaped = String::with_capacity(raw.len());

    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#xD;"),
            '\t' | '\n' => escaped.push(ch),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {
                return Err(ProtocolError::UnrepresentableText {
                    value: raw.to_string(),
                });
            }
            _ => escaped.push(ch),
        }
    }

    Ok(escaped)
}

fn from_document(document: &str) -> Option<GenerationResult> {
    let document = roxmltree::Document::parse(document).ok()?;
    let root = document.root_element();

    let mut result = GenerationResult::default();

    for group in root.children().filter(|node| node.is_element()) {
        let target = match group.tag_name().name() {
            CODE_FILES_ELEMENT => &mut result.generated_code_files,
            PLAIN_FILES_ELEMENT => &mut result.generated_plain_files,
            PATHS_ELEMENT => &mut result.generated_paths,
            _ => continue,
        };

        // A repeated group replaces the earlier one.
        *target = group
            .children()
            .filter(|node| node.is_element() && node.tag_name().name() == ITEM_ELEMENT)
            .map(|item| {
                item.children()
                    .filter(|node| node.is_text())
                    .filter_map(|node| node.text())
                    .collect::<String>()
            })
            .collect();
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(text: &str) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(text.as_bytes()).unwrap();
        hex::encode(encoder.finish().unwrap())
    }

    fn sample() -> GenerationResult {
        GenerationResult::new(
            vec!["obj/gen/IUser.g.cs".into(), "obj/gen/UserWrapper.g.cs".into()],
            vec!["obj/gen/genhost.log".into()],
            vec!["obj/gen".into()],
        )
    }

    #[test]
    fn test_round_trip() {
        let result = sample();
        let token = encode(&result).unwrap();
        assert_eq!(decode(&token), Some(result));
    }

    #[test]
    fn test_token_is_lowercase_hex() {
        let token = encode(&sample()).unwrap();
        assert_eq!(token.len() % 2, 0);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_round_trip_empty_result() {
        let token = encode(&GenerationResult::default()).unwrap();
        assert_eq!(decode(&token), Some(GenerationResult::default()));
    }

    #[test]
    fn test_round_trip_markup_characters() {
        let result = GenerationResult::new(
            vec!["a<b>&c\"d'e.cs".into(), "]]>".into()],
            vec!["line1\nline2\r\nline3\ttab".into(), String::new()],
            vec!["  padded  ".into()],
        );
        let token = encode(&result).unwrap();
        assert_eq!(decode(&token), Some(result));
    }

    #[test]
    fn test_round_trip_non_ascii() {
        let result = GenerationResult::new(vec!["生成/ファイル.cs".into(), "é🚀".into()], vec![], vec![]);
        let token = encode(&result).unwrap();
        assert_eq!(decode(&token), Some(result));
    }

    #[test]
    fn test_encode_rejects_control_characters() {
        let result = GenerationResult::new(vec!["bad\u{1}name".into()], vec![], vec![]);
        let err = encode(&result).unwrap_err();
        assert!(matches!(err, ProtocolError::UnrepresentableText { .. }));
    }

    #[test]
    fn test_document_is_compact() {
        let document = String::from_utf8(to_document(&sample()).unwrap()).unwrap();
        assert!(!document.contains("\n<"));
        assert!(document.contains("<GeneratedCodeFiles><item>obj/gen/IUser.g.cs</item>"));
        assert!(document.contains("<GeneratedPlainFiles><item>obj/gen/genhost.log</item></GeneratedPlainFiles>"));
    }

    #[test]
    fn test_decode_blank_is_none() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("   \n\t"), None);
    }

    #[test]
    fn test_decode_odd_length_is_none() {
        assert_eq!(decode("abc"), None);
    }

    #[test]
    fn test_decode_invalid_hex_is_none() {
        assert_eq!(decode("zz"), None);
        assert_eq!(decode("1f8g"), None);
    }

    #[test]
    fn test_decode_hex_but_not_gzip_is_none() {
        assert_eq!(decode("deadbeef"), None);
    }

    #[test]
    fn test_decode_gzip_but_not_xml_is_none() {
        assert_eq!(decode(&compress("plain text, no markup")), None);
        assert_eq!(decode(&compress("<unclosed>")), None);
        assert_eq!(decode(&compress("   ")), None);
    }

    #[test]
    fn test_decode_missing_groups_are_empty() {
        let token = compress("<R><GeneratedPaths><item>gen</item></GeneratedPaths></R>");
        let result = decode(&token).unwrap();

        assert!(result.generated_code_files.is_empty());
        assert!(result.generated_plain_files.is_empty());
        assert_eq!(result.generated_paths, vec!["gen".to_string()]);
    }

    #[test]
    fn test_decode_ignores_unknown_groups_and_elements() {
        let token = compress(
            "<R><Unknown><item>x</item></Unknown>\
             <GeneratedCodeFiles><other>y</other><item>a.cs</item></GeneratedCodeFiles></R>",
        );
        let result = decode(&token).unwrap();

        assert_eq!(result.generated_code_files, vec!["a.cs".to_string()]);
        assert!(result.generated_paths.is_empty());
    }

    #[test]
    fn test_decode_accepts_any_root_name() {
        let token = compress("<genhost_0123><GeneratedCodeFiles><item>a.cs</item></GeneratedCodeFiles></genhost_0123>");
        let result = decode(&token).unwrap();
        assert_eq!(result.generated_code_files, vec!["a.cs".to_string()]);
    }
}
