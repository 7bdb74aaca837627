// SPDX-License-Identifier: MPL-2.0
//! `data:` URLs carrying base64 image payloads.
//!
//! Uploaded photos and flattened designs travel inside cart JSON as
//! `data:<mime>;base64,<payload>` strings.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    #[must_use]
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Parses a base64 data URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] when the string is not a base64 data URL
    /// or the payload is not valid base64.
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix(SCHEME)
            .ok_or_else(|| Error::Encoding("missing data: scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::Encoding("missing data URL payload".into()))?;
        let mime = header
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| Error::Encoding("only base64 data URLs are supported".into()))?;
        let mime = if mime.is_empty() {
            "application/octet-stream"
        } else {
            mime
        };
        let bytes = STANDARD.decode(payload.trim())?;
        Ok(Self::new(mime, bytes))
    }
}

/// Encodes bytes as a base64 data URL.
#[must_use]
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("{SCHEME}{mime}{BASE64_MARKER},{}", STANDARD.encode(bytes))
}

#[must_use]
pub fn is_data_url(value: &str) -> bool {
    value.starts_with(SCHEME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_png_prefix() {
        let url = encode("image/png", &[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(is_data_url(&url));
    }

    #[test]
    fn parse_recovers_mime_and_bytes() {
        let parsed = DataUrl::parse("data:image/jpeg;base64,AQID").expect("valid url");
        assert_eq!(parsed.mime, "image/jpeg");
        assert_eq!(parsed.bytes, vec![1, 2, 3]);
        assert_eq!(encode(&parsed.mime, &parsed.bytes), "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn parse_defaults_missing_mime() {
        let parsed = DataUrl::parse("data:;base64,AQID").expect("valid url");
        assert_eq!(parsed.mime, "application/octet-stream");
    }

    #[test]
    fn parse_rejects_non_base64_urls() {
        assert!(matches!(
            DataUrl::parse("data:text/plain,hello"),
            Err(Error::Encoding(_))
        ));
        assert!(matches!(
            DataUrl::parse("https://example.com/a.png"),
            Err(Error::Encoding(_))
        ));
        assert!(matches!(
            DataUrl::parse("data:image/png;base64,@@@"),
            Err(Error::Encoding(_))
        ));
    }
}
