//! Reversible text-safe encoding for raw code preserved in rendered HTML

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Failure while recovering the original text of a code block
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decoded payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode raw code text so it survives embedding in an HTML attribute
pub fn encode_raw(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Recover the raw code text produced by [`encode_raw`]
pub fn decode_raw(encoded: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_form_is_attribute_safe() {
        let encoded = encode_raw("if (a < b && c > \"d\") { return 'e'; }");
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')));
    }

    #[test]
    fn test_decode_multiline_with_backticks() -> Result<(), DecodeError> {
        let raw = "let s = `tpl ${x}`;\n\n\tindented\r\n";
        assert_eq!(decode_raw(&encode_raw(raw))?, raw);
        Ok(())
    }

    #[test]
    fn test_decode_empty() -> Result<(), DecodeError> {
        assert_eq!(decode_raw(&encode_raw(""))?, "");
        Ok(())
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_raw("not base64!!"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let encoded = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode_raw(&encoded), Err(DecodeError::Utf8(_))));
    }
}
