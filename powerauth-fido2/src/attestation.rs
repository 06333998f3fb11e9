//! Attestation object decoding.

use ciborium::value::Value;

use powerauth_types::encoding::{try_from_base64, try_from_base64url};

use crate::{AuthenticatorData, Fido2ParseError};

/// Attestation statement format identifier.
///
/// Unrecognized identifiers still parse; the ceremony validator decides
/// whether the format is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationFormat {
    /// The `packed` format; its statement must carry a matching algorithm.
    Packed,
    /// The `none` format, used with self or no attestation.
    None,
    /// Any other identifier from the IANA registry.
    Other(String),
}

impl AttestationFormat {
    /// Formats the server accepts during registration.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Packed | Self::None)
    }

    /// Canonical identifier string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Packed => "packed",
            Self::None => "none",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for AttestationFormat {
    fn from(value: &str) -> Self {
        match value {
            "packed" => Self::Packed,
            "none" => Self::None,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Attestation statement fields the server inspects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttestationStatement {
    /// COSE algorithm identifier of the attestation signature, if present.
    pub algorithm: Option<i64>,
    /// Attestation signature bytes, if present.
    pub signature: Vec<u8>,
}

/// A decoded attestation object: format tag, statement, and the embedded
/// authenticator data.
#[derive(Debug, Clone, PartialEq)]
pub struct AttestationObject {
    /// Attestation statement format.
    pub fmt: AttestationFormat,
    /// Attestation statement.
    pub att_stmt: AttestationStatement,
    /// Embedded authenticator data.
    pub auth_data: AuthenticatorData,
}

impl AttestationObject {
    /// Decode an attestation object from its base64 (or base64url) string
    /// form, a CBOR map with `fmt`, `attStmt` and `authData` entries.
    pub fn from_base64(payload: &str) -> Result<Self, Fido2ParseError> {
        let bytes = try_from_base64(payload)
            .or_else(|| try_from_base64url(payload))
            .ok_or(Fido2ParseError::InvalidBase64)?;
        Self::from_slice(&bytes)
    }

    /// Decode an attestation object from raw CBOR bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Fido2ParseError> {
        let value: Value =
            ciborium::de::from_reader(bytes).map_err(Fido2ParseError::cbor)?;
        let Value::Map(entries) = value else {
            return Err(Fido2ParseError::InvalidCbor("expected a CBOR map".into()));
        };

        let (mut fmt, mut att_stmt, mut auth_data) = (None, None, None);
        for (key, value) in &entries {
            match key.as_text() {
                Some("fmt") => {
                    fmt = value.as_text().map(AttestationFormat::from);
                }
                Some("attStmt") => {
                    att_stmt = Some(parse_statement(value)?);
                }
                Some("authData") => {
                    auth_data = value
                        .as_bytes()
                        .map(|bytes| AuthenticatorData::from_slice(bytes))
                        .transpose()?;
                }
                _ => (),
            }
        }

        Ok(Self {
            fmt: fmt.ok_or(Fido2ParseError::MissingField("fmt"))?,
            att_stmt: att_stmt.ok_or(Fido2ParseError::MissingField("attStmt"))?,
            auth_data: auth_data.ok_or(Fido2ParseError::MissingField("authData"))?,
        })
    }
}

fn parse_statement(value: &Value) -> Result<AttestationStatement, Fido2ParseError> {
    let Value::Map(entries) = value else {
        return Err(Fido2ParseError::InvalidCbor("attStmt is not a map".into()));
    };
    let mut statement = AttestationStatement::default();
    for (key, value) in entries {
        match key.as_text() {
            Some("alg") => {
                statement.algorithm = value.as_integer().and_then(|i| i128::from(i).try_into().ok());
            }
            Some("sig") => {
                if let Some(bytes) = value.as_bytes() {
                    statement.signature = bytes.clone();
                }
            }
            _ => (),
        }
    }
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use ciborium::cbor;

    use powerauth_types::encoding::base64;

    use crate::{Aaguid, AttestedCredentialData, PublicKeyObject};

    use super::*;

    fn sample_auth_data() -> AuthenticatorData {
        AuthenticatorData::new("example.com", 0).with_attested_credential_data(
            AttestedCredentialData::new(
                Aaguid([5; 16]),
                vec![1, 2, 3, 4],
                PublicKeyObject { x: [6; 32], y: [7; 32] },
            )
            .unwrap(),
        )
    }

    fn sample_object_bytes(fmt: &str, alg: i64) -> Vec<u8> {
        let value = cbor!({
            "fmt" => fmt,
            "attStmt" => {
                "alg" => alg,
                "sig" => Value::Bytes(vec![9; 8]),
            },
            "authData" => Value::Bytes(sample_auth_data().to_vec()),
        })
        .unwrap();
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).unwrap();
        bytes
    }

    #[test]
    fn decodes_packed_object_from_base64() {
        let encoded = base64(&sample_object_bytes("packed", -7));
        let object = AttestationObject::from_base64(&encoded).unwrap();
        assert_eq!(object.fmt, AttestationFormat::Packed);
        assert_eq!(object.att_stmt.algorithm, Some(-7));
        assert_eq!(object.auth_data, sample_auth_data());
    }

    #[test]
    fn unknown_format_still_parses() {
        let object = AttestationObject::from_slice(&sample_object_bytes("android-key", -7)).unwrap();
        assert_eq!(object.fmt, AttestationFormat::Other("android-key".into()));
        assert!(!object.fmt.is_allowed());
    }

    #[test]
    fn missing_auth_data_is_reported() {
        let value = cbor!({ "fmt" => "none", "attStmt" => {} }).unwrap();
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).unwrap();
        assert!(matches!(
            AttestationObject::from_slice(&bytes).unwrap_err(),
            Fido2ParseError::MissingField("authData")
        ));
    }

    #[test]
    fn garbage_base64_is_rejected() {
        assert!(matches!(
            AttestationObject::from_base64("@@@").unwrap_err(),
            Fido2ParseError::InvalidBase64
        ));
    }

    #[test]
    fn garbage_cbor_is_rejected() {
        assert!(matches!(
            AttestationObject::from_slice(&[0xFF, 0x00, 0x01]).unwrap_err(),
            Fido2ParseError::InvalidCbor(_)
        ));
    }
}
