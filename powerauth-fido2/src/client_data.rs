//! Collected client data decoding.

use serde::{Deserialize, Serialize};

use powerauth_types::encoding::{try_from_base64, try_from_base64url};

use crate::Fido2ParseError;

/// The client data collected by the browser during a WebAuthn ceremony,
/// received as a base64-wrapped JSON blob.
///
/// <https://w3c.github.io/webauthn/#dictdef-collectedclientdata>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedClientData {
    /// Ceremony type: `webauthn.create` for registration, `webauthn.get`
    /// for assertion.
    #[serde(rename = "type")]
    pub ty: String,
    /// Challenge the relying party issued, base64url as sent by the browser.
    pub challenge: String,
    /// Origin the ceremony was performed on.
    pub origin: String,
    /// Top-level origin when the ceremony ran in a cross-origin iframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_origin: Option<String>,
    /// Whether the ceremony ran cross-origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_origin: Option<bool>,
}

impl CollectedClientData {
    /// Ceremony type of a registration.
    pub const TYPE_CREATE: &'static str = "webauthn.create";
    /// Ceremony type of an assertion.
    pub const TYPE_GET: &'static str = "webauthn.get";

    /// Decode client data from its base64 (or base64url) JSON form.
    pub fn from_base64(payload: &str) -> Result<Self, Fido2ParseError> {
        let bytes = try_from_base64(payload)
            .or_else(|| try_from_base64url(payload))
            .ok_or(Fido2ParseError::InvalidBase64)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use powerauth_types::encoding::{base64, base64url};

    use super::*;

    const SAMPLE: &str = r#"{
        "type": "webauthn.get",
        "challenge": "dGVzdC1jaGFsbGVuZ2U",
        "origin": "https://example.com",
        "crossOrigin": false
    }"#;

    #[test]
    fn decodes_from_base64_and_base64url() {
        for encoded in [base64(SAMPLE.as_bytes()), base64url(SAMPLE.as_bytes())] {
            let data = CollectedClientData::from_base64(&encoded).unwrap();
            assert_eq!(data.ty, CollectedClientData::TYPE_GET);
            assert_eq!(data.challenge, "dGVzdC1jaGFsbGVuZ2U");
            assert_eq!(data.origin, "https://example.com");
            assert_eq!(data.top_origin, None);
            assert_eq!(data.cross_origin, Some(false));
        }
    }

    #[test]
    fn top_origin_is_read_when_present() {
        let json = r#"{
            "type": "webauthn.create",
            "challenge": "x",
            "origin": "https://frame.example.net",
            "topOrigin": "https://example.com"
        }"#;
        let data = CollectedClientData::from_base64(&base64(json.as_bytes())).unwrap();
        assert_eq!(data.top_origin.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn invalid_json_is_a_typed_error() {
        let err = CollectedClientData::from_base64(&base64(b"{not json")).unwrap_err();
        assert!(matches!(err, Fido2ParseError::InvalidJson(_)));
    }
}
