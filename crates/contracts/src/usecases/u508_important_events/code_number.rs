//! Code number carried in the page path.
//!
//! The path segment is `base64(base64(base64(json)))` where the JSON object
//! holds a `codeNumber` string. This only hides the code from casual
//! reading; it is neither signed nor encrypted.

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of base64 layers wrapped around the JSON parameter
pub const ENCODING_PASSES: usize = 3;

/// Decoder as forgiving as the browser's `atob`: padding optional, stray
/// trailing bits ignored
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Opaque respondent key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeNumber(pub String);

impl CodeNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodeParamError {
    #[error("path segment is empty")]
    Empty,
    #[error("base64 decoding failed on pass {pass}: {source}")]
    Base64 {
        pass: usize,
        #[source]
        source: base64::DecodeError,
    },
    #[error("decoded parameter is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("decoded parameter has no codeNumber")]
    MissingCodeNumber,
}

#[derive(Serialize, Deserialize)]
struct CodeParam {
    #[serde(rename = "codeNumber")]
    code_number: Option<String>,
}

/// Recover the code number from a location path segment.
///
/// A single leading `/` is ignored, so `location.pathname` can be passed
/// as is. Decoded bytes are read as UTF-8 and, failing that, as Latin-1
/// the way `btoa`-produced links carry them.
pub fn decode_code_number(segment: &str) -> Result<CodeNumber, CodeParamError> {
    let segment = segment.strip_prefix('/').unwrap_or(segment).trim();
    if segment.is_empty() {
        return Err(CodeParamError::Empty);
    }

    let mut text = segment.to_string();
    for pass in 1..=ENCODING_PASSES {
        text.retain(|c| !c.is_ascii_whitespace());
        let bytes = LENIENT
            .decode(text.as_bytes())
            .map_err(|source| CodeParamError::Base64 { pass, source })?;
        text = bytes_to_text(bytes);
    }

    let param: CodeParam = serde_json::from_str(&text)?;
    match param.code_number {
        Some(code) if !code.trim().is_empty() => Ok(CodeNumber(code)),
        _ => Err(CodeParamError::MissingCodeNumber),
    }
}

fn bytes_to_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Build the path segment for a code number (inverse of [`decode_code_number`])
pub fn encode_code_number(code: &CodeNumber) -> String {
    let param = CodeParam {
        code_number: Some(code.0.clone()),
    };
    // Serializing a struct of one optional string cannot fail
    let mut text = serde_json::to_string(&param).unwrap_or_default();
    for _ in 0..ENCODING_PASSES {
        text = STANDARD.encode(text.as_bytes());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC123_SEGMENT: &str = "WlhsS2FtSXlVbXhVYmxaMFdXMVdlVWxxYjJsUlZVcEVUVlJKZWtsdU1EMD0=";

    #[test]
    fn test_decode_known_segment() {
        let code = decode_code_number(ABC123_SEGMENT).unwrap();
        assert_eq!(code.as_str(), "ABC123");
    }

    #[test]
    fn test_decode_accepts_pathname() {
        let path = format!("/{}", ABC123_SEGMENT);
        assert_eq!(decode_code_number(&path).unwrap(), CodeNumber::new("ABC123"));
    }

    #[test]
    fn test_encode_matches_known_segment() {
        assert_eq!(encode_code_number(&CodeNumber::new("ABC123")), ABC123_SEGMENT);
    }

    #[test]
    fn test_encode_then_decode_non_ascii() {
        let code = CodeNumber::new("Ä-42/ü");
        let segment = encode_code_number(&code);
        assert_eq!(decode_code_number(&segment).unwrap(), code);
    }

    #[test]
    fn test_decode_without_padding() {
        let trimmed = ABC123_SEGMENT.trim_end_matches('=');
        assert_ne!(trimmed, ABC123_SEGMENT);
        assert_eq!(decode_code_number(trimmed).unwrap(), CodeNumber::new("ABC123"));
    }

    #[test]
    fn test_decode_latin1_payload() {
        // {"codeNumber":"Ä1"} as single-byte text, the way btoa encodes it
        let mut bytes = br#"{"codeNumber":""#.to_vec();
        bytes.push(0xC4);
        bytes.extend_from_slice(br#"1"}"#);

        let mut segment = STANDARD.encode(&bytes);
        for _ in 1..ENCODING_PASSES {
            segment = STANDARD.encode(segment.as_bytes());
        }
        assert_eq!(decode_code_number(&segment).unwrap(), CodeNumber::new("Ä1"));
    }

    #[test]
    fn test_empty_segment() {
        assert!(matches!(decode_code_number(""), Err(CodeParamError::Empty)));
        assert!(matches!(decode_code_number("/"), Err(CodeParamError::Empty)));
    }

    #[test]
    fn test_malformed_segment() {
        let err = decode_code_number("not*base64").unwrap_err();
        assert!(matches!(err, CodeParamError::Base64 { pass: 1, .. }));
    }

    #[test]
    fn test_only_two_layers() {
        // {"codeNumber":"ABC123"} wrapped twice: the third pass hits raw JSON
        let err = decode_code_number("ZXlKamIyUmxUblZ0WW1WeUlqb2lRVUpETVRJekluMD0=").unwrap_err();
        assert!(matches!(err, CodeParamError::Base64 { pass: 3, .. }));
    }

    #[test]
    fn test_missing_field() {
        // {"other":"x"} wrapped three times
        let err = decode_code_number("WlhsS2RtUkhhR3hqYVVrMlNXNW5hV1pSUFQwPQ==").unwrap_err();
        assert!(matches!(err, CodeParamError::MissingCodeNumber));
    }

    #[test]
    fn test_layers_not_json() {
        let mut text = "plain text".to_string();
        for _ in 0..ENCODING_PASSES {
            text = STANDARD.encode(text.as_bytes());
        }
        assert!(matches!(
            decode_code_number(&text),
            Err(CodeParamError::Json(_))
        ));
    }
}
