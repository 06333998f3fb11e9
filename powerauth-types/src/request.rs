//! Canonical signed-data codec.
//!
//! A PowerAuth client signs the concatenation
//! `${METHOD}&${URI_ID_B64}&${NONCE_B64}&${BODY_B64}&${APP_SECRET_B64}`.
//! The server parses this string back for auditing and never guesses on
//! malformed input: anything that is not exactly five `&`-separated segments
//! with valid base64 in segments two to five is a parse error, which the
//! verifier treats as an automatically invalid signature.

use thiserror::Error;

use crate::encoding::try_from_base64;

/// Parse failure of the canonical signed-data string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestParseError {
    /// Signed data was not valid UTF-8.
    #[error("signed data is not valid UTF-8")]
    NotUtf8,
    /// The string did not have exactly five `&`-separated segments.
    #[error("expected 5 signed data segments, found {0}")]
    SegmentCount(usize),
    /// A base64 segment failed to decode.
    #[error("segment {index} is not valid base64")]
    InvalidBase64 {
        /// Zero-based index of the offending segment.
        index: usize,
    },
    /// A decoded segment was expected to be text but was not UTF-8.
    #[error("segment {index} is not valid UTF-8")]
    SegmentNotUtf8 {
        /// Zero-based index of the offending segment.
        index: usize,
    },
}

/// Parsed view of the canonical signed-data string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequestData {
    /// HTTP method, the only segment that is not base64-encoded.
    pub method: String,
    /// Decoded URI identifier, e.g. `/pa/signature/validate`.
    pub uri_identifier: String,
    /// Decoded request body.
    pub body: String,
}

impl SignatureRequestData {
    /// Parse signature request data from the raw signed bytes.
    pub fn parse(data: &[u8]) -> Result<Self, RequestParseError> {
        let text = std::str::from_utf8(data).map_err(|_| RequestParseError::NotUtf8)?;

        let parts: Vec<&str> = text.split('&').collect();
        if parts.len() != 5 {
            return Err(RequestParseError::SegmentCount(parts.len()));
        }

        // Segments 1..=4 must decode even where the decoded value is not kept,
        // so a corrupt nonce or app secret is reported as a parse failure.
        let mut decoded = Vec::with_capacity(4);
        for (index, part) in parts.iter().enumerate().skip(1) {
            let bytes =
                try_from_base64(part).ok_or(RequestParseError::InvalidBase64 { index })?;
            decoded.push((index, bytes));
        }

        let text_segment = |index: usize, bytes: &[u8]| {
            String::from_utf8(bytes.to_vec())
                .map_err(|_| RequestParseError::SegmentNotUtf8 { index })
        };

        let uri_identifier = text_segment(1, &decoded[0].1)?;
        let body = text_segment(3, &decoded[2].1)?;

        Ok(Self {
            method: parts[0].to_owned(),
            uri_identifier,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::encoding::base64;

    use super::*;

    fn signed_data(method: &str, uri: &str, nonce: &[u8], body: &str, secret: &str) -> Vec<u8> {
        format!(
            "{}&{}&{}&{}&{}",
            method,
            base64(uri.as_bytes()),
            base64(nonce),
            base64(body.as_bytes()),
            base64(secret.as_bytes()),
        )
        .into_bytes()
    }

    #[test]
    fn well_formed_data_round_trips() {
        let data = signed_data("POST", "/pa/token/create", &[7; 16], "{}", "app-secret");
        let parsed = SignatureRequestData::parse(&data).unwrap();
        assert_eq!(parsed.method, "POST");
        assert_eq!(parsed.uri_identifier, "/pa/token/create");
        assert_eq!(parsed.body, "{}");
    }

    #[test]
    fn missing_separator_fails_with_segment_count() {
        // "POST" glued to the base64 URI, i.e. a missing `&`.
        let uri = base64(b"/pa/token/create");
        let data = format!("POST{uri}&AAAA&AAAA&AAAA").into_bytes();
        assert_eq!(
            SignatureRequestData::parse(&data),
            Err(RequestParseError::SegmentCount(4))
        );
    }

    #[test]
    fn six_segments_fail_as_well() {
        let data = b"POST&AAAA&AAAA&AAAA&AAAA&AAAA".to_vec();
        assert_eq!(
            SignatureRequestData::parse(&data),
            Err(RequestParseError::SegmentCount(6))
        );
    }

    #[test]
    fn invalid_base64_segment_is_reported_by_index() {
        let data = b"POST&!!!&AAAA&AAAA&AAAA".to_vec();
        assert_eq!(
            SignatureRequestData::parse(&data),
            Err(RequestParseError::InvalidBase64 { index: 1 })
        );
    }

    #[test]
    fn non_utf8_input_is_rejected() {
        assert_eq!(
            SignatureRequestData::parse(&[0xff, 0xfe, b'&']),
            Err(RequestParseError::NotUtf8)
        );
    }
}
