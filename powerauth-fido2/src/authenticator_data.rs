//! Fixed-layout authenticator data parsing.

use std::io::{Cursor, Read};

use ciborium::value::Value;
use coset::{
    iana::{self, EnumI64},
    AsCborValue, CborSerializable, CoseKey, CoseKeyBuilder,
};

use crate::{Aaguid, Fido2ParseError, Flags};

/// Byte length of the fixed authenticator data prefix:
/// rpIdHash (32) + flags (1) + signCount (4).
const FIXED_PREFIX_LEN: usize = 37;

/// The authenticator data structure: contextual bindings made by the
/// authenticator, received from the client as an opaque byte buffer.
///
/// <https://w3c.github.io/webauthn/#sctn-authenticator-data>
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatorData {
    /// SHA-256 hash of the RP ID the credential is scoped to.
    rp_id_hash: [u8; 32],
    /// Flags byte, see [`Flags`].
    pub flags: Flags,
    /// Signature counter, big-endian on the wire. Plays the role of the
    /// numeric replay counter when the credential is bridged onto an
    /// activation.
    pub sign_count: u32,
    /// Attested credential block, present when [`Flags::AT`] is set.
    pub attested_credential_data: Option<AttestedCredentialData>,
    /// Extension outputs, present when [`Flags::ED`] is set. Kept as a raw
    /// CBOR value; the server does not interpret extensions.
    pub extensions: Option<Value>,
}

impl AuthenticatorData {
    /// Build authenticator data for an RP ID, with default flags. Used by
    /// tests to synthesize payloads.
    pub fn new(rp_id: &str, sign_count: u32) -> Self {
        Self {
            rp_id_hash: crate::sha256(rp_id.as_bytes()),
            flags: Flags::UP,
            sign_count,
            attested_credential_data: None,
            extensions: None,
        }
    }

    /// Attach an attested credential block; sets [`Flags::AT`].
    pub fn with_attested_credential_data(mut self, acd: AttestedCredentialData) -> Self {
        self.attested_credential_data = Some(acd);
        self.with_flags(Flags::AT)
    }

    /// Set additional flags.
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags |= flags;
        self
    }

    /// Read access to the RP ID hash.
    pub fn rp_id_hash(&self) -> &[u8; 32] {
        &self.rp_id_hash
    }

    /// Decode authenticator data from a byte slice.
    pub fn from_slice(v: &[u8]) -> Result<Self, Fido2ParseError> {
        if v.len() < FIXED_PREFIX_LEN {
            return Err(Fido2ParseError::TruncatedData {
                expected: FIXED_PREFIX_LEN,
                actual: v.len(),
            });
        }

        // SAFETY: split_at panics only past the length, guarded above.
        let (rp_id_hash, v) = v.split_at(32);
        let (flag_byte, v) = v.split_at(1);
        let (sign_count, v) = v.split_at(4);

        let flags = Flags::from_bits(flag_byte[0])
            .ok_or(Fido2ParseError::ReservedFlagBits(flag_byte[0]))?;

        let mut reader = Cursor::new(v);
        let attested_credential_data = flags
            .contains(Flags::AT)
            .then(|| AttestedCredentialData::from_reader(&mut reader))
            .transpose()?;
        let extensions = flags
            .contains(Flags::ED)
            .then(|| ciborium::de::from_reader(&mut reader).map_err(Fido2ParseError::cbor))
            .transpose()?;

        // SAFETY: the slices come from split_at with fixed sizes.
        Ok(Self {
            rp_id_hash: rp_id_hash.try_into().unwrap(),
            flags,
            sign_count: u32::from_be_bytes(sign_count.try_into().unwrap()),
            attested_credential_data,
            extensions,
        })
    }

    /// Encode the structure back to its byte representation.
    pub fn to_vec(&self) -> Vec<u8> {
        let flags = if self.attested_credential_data.is_some() {
            self.flags | Flags::AT
        } else {
            self.flags
        };

        let mut out = Vec::with_capacity(FIXED_PREFIX_LEN);
        out.extend_from_slice(&self.rp_id_hash);
        out.push(flags.into());
        out.extend_from_slice(&self.sign_count.to_be_bytes());
        if let Some(acd) = &self.attested_credential_data {
            acd.write_to(&mut out);
        }
        if let Some(extensions) = &self.extensions {
            // SAFETY: serializing an in-memory CBOR value to a Vec cannot
            // fail; it would be programmer error.
            ciborium::ser::into_writer(extensions, &mut out).unwrap();
        }
        out
    }
}

/// The variable-length attested credential block inside authenticator data.
///
/// <https://w3c.github.io/webauthn/#attested-credential-data>
#[derive(Debug, Clone, PartialEq)]
pub struct AttestedCredentialData {
    /// The AAGUID of the authenticator model.
    pub aaguid: Aaguid,
    /// Credential ID; its length is carried in a 2-byte prefix on the wire,
    /// so it can never exceed `u16::MAX`.
    credential_id: Vec<u8>,
    /// Credential public key, restricted to ES256 / P-256 / EC2.
    pub public_key: PublicKeyObject,
}

impl AttestedCredentialData {
    /// Create an attested credential block.
    ///
    /// Fails if the credential ID length cannot be represented by a `u16`.
    pub fn new(
        aaguid: Aaguid,
        credential_id: Vec<u8>,
        public_key: PublicKeyObject,
    ) -> Result<Self, Fido2ParseError> {
        u16::try_from(credential_id.len()).map_err(|_| Fido2ParseError::CredentialIdLength {
            claimed: credential_id.len(),
            available: usize::from(u16::MAX),
        })?;
        Ok(Self {
            aaguid,
            credential_id,
            public_key,
        })
    }

    /// Read access to the credential ID.
    pub fn credential_id(&self) -> &[u8] {
        &self.credential_id
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.aaguid.0);
        // SAFETY: length was asserted to fit a u16 in the constructor.
        out.extend_from_slice(&u16::try_from(self.credential_id.len()).unwrap().to_be_bytes());
        out.extend_from_slice(&self.credential_id);
        // SAFETY: serializing a freshly built COSE key cannot fail.
        out.extend_from_slice(&self.public_key.to_cose_key().to_vec().unwrap());
    }

    fn from_reader(reader: &mut Cursor<&[u8]>) -> Result<Self, Fido2ParseError> {
        let remaining = |cursor: &Cursor<&[u8]>| {
            // SAFETY: position never exceeds the buffer length for a cursor
            // that is only read from.
            cursor.get_ref().len() - usize::try_from(cursor.position()).unwrap()
        };

        let mut aaguid = [0u8; Aaguid::LEN];
        reader
            .read_exact(&mut aaguid)
            .map_err(|_| Fido2ParseError::TruncatedData {
                expected: Aaguid::LEN,
                actual: remaining(reader),
            })?;

        let mut len_bytes = [0u8; 2];
        reader
            .read_exact(&mut len_bytes)
            .map_err(|_| Fido2ParseError::TruncatedData {
                expected: 2,
                actual: remaining(reader),
            })?;
        let credential_id_len = usize::from(u16::from_be_bytes(len_bytes));

        // Bound the allocation by what the buffer actually holds.
        let available = remaining(reader);
        if credential_id_len > available {
            return Err(Fido2ParseError::CredentialIdLength {
                claimed: credential_id_len,
                available,
            });
        }
        let mut credential_id = vec![0u8; credential_id_len];
        reader
            .read_exact(&mut credential_id)
            .map_err(|_| Fido2ParseError::TruncatedData {
                expected: credential_id_len,
                actual: available,
            })?;

        let cose_value: Value =
            ciborium::de::from_reader(reader).map_err(Fido2ParseError::cbor)?;
        let cose_key = CoseKey::from_cbor_value(cose_value).map_err(Fido2ParseError::cbor)?;
        let public_key = PublicKeyObject::from_cose_key(&cose_key)?;

        Ok(Self {
            aaguid: Aaguid(aaguid),
            credential_id,
            public_key,
        })
    }
}

/// A credential public key, already validated to be the only combination the
/// server accepts: ES256 over P-256 with an EC2 uncompressed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyObject {
    /// X coordinate of the point.
    pub x: [u8; 32],
    /// Y coordinate of the point.
    pub y: [u8; 32],
}

impl PublicKeyObject {
    /// COSE algorithm identifier of the only accepted algorithm (ES256).
    pub const ALGORITHM: i64 = -7;

    /// Validate a COSE key and extract the point.
    ///
    /// Anything other than algorithm ES256, curve P-256 and key type EC2 is
    /// an error, not a best-effort fallback.
    pub fn from_cose_key(key: &CoseKey) -> Result<Self, Fido2ParseError> {
        if !matches!(
            key.alg,
            Some(coset::RegisteredLabelWithPrivate::Assigned(
                iana::Algorithm::ES256
            ))
        ) {
            return Err(Fido2ParseError::UnsupportedAlgorithm);
        }
        if !matches!(key.kty, coset::RegisteredLabel::Assigned(iana::KeyType::EC2)) {
            return Err(Fido2ParseError::UnsupportedKeyType);
        }

        let (mut crv, mut x, mut y) = (None, None, None);
        for (label, value) in &key.params {
            let coset::Label::Int(i) = label else { continue };
            match iana::Ec2KeyParameter::from_i64(*i) {
                Some(iana::Ec2KeyParameter::Crv) => crv = value.as_integer(),
                Some(iana::Ec2KeyParameter::X) => x = value.as_bytes(),
                Some(iana::Ec2KeyParameter::Y) => y = value.as_bytes(),
                _ => (),
            }
        }

        let p256 = ciborium::value::Integer::from(iana::EllipticCurve::P_256.to_i64());
        if crv != Some(p256) {
            return Err(Fido2ParseError::UnsupportedCurve);
        }

        let (Some(x), Some(y)) = (x, y) else {
            return Err(Fido2ParseError::MalformedCoordinate);
        };
        Ok(Self {
            x: x.as_slice()
                .try_into()
                .map_err(|_| Fido2ParseError::MalformedCoordinate)?,
            y: y.as_slice()
                .try_into()
                .map_err(|_| Fido2ParseError::MalformedCoordinate)?,
        })
    }

    /// Rebuild the COSE representation.
    pub fn to_cose_key(&self) -> CoseKey {
        CoseKeyBuilder::new_ec2_pub_key(
            iana::EllipticCurve::P_256,
            self.x.to_vec(),
            self.y.to_vec(),
        )
        .algorithm(iana::Algorithm::ES256)
        .build()
    }

    /// SEC1 uncompressed point encoding (`0x04 || x || y`), the form stored
    /// on an activation as the device public key.
    pub fn to_uncompressed_point(&self) -> Vec<u8> {
        let mut point = Vec::with_capacity(65);
        point.push(0x04);
        point.extend_from_slice(&self.x);
        point.extend_from_slice(&self.y);
        point
    }
}
