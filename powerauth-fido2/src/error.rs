use thiserror::Error;

/// Typed deserialization failure for untrusted FIDO2 payloads.
///
/// Anything a client can cause by sending malformed bytes lands here; the
/// parsers never panic on input.
#[derive(Debug, Error)]
pub enum Fido2ParseError {
    /// The buffer ended before a fixed-layout field.
    #[error("authenticator data truncated: need {expected} bytes, got {actual}")]
    TruncatedData {
        /// Bytes required by the layout.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },
    /// The flags byte had a reserved bit set.
    #[error("reserved flag bits set: {0:#010b}")]
    ReservedFlagBits(u8),
    /// A claimed length field exceeded the remaining buffer.
    #[error("credential ID length {claimed} exceeds remaining {available} bytes")]
    CredentialIdLength {
        /// Length claimed by the 2-byte field.
        claimed: usize,
        /// Bytes actually remaining in the buffer.
        available: usize,
    },
    /// Input was not valid base64 / base64url.
    #[error("payload is not valid base64")]
    InvalidBase64,
    /// Embedded CBOR could not be decoded.
    #[error("invalid CBOR: {0}")]
    InvalidCbor(String),
    /// Client data JSON could not be decoded.
    #[error("invalid client data JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// A required attestation object field was absent.
    #[error("attestation object is missing `{0}`")]
    MissingField(&'static str),
    /// The COSE public key used an algorithm other than ES256.
    #[error("unsupported COSE algorithm")]
    UnsupportedAlgorithm,
    /// The COSE public key used a curve other than P-256.
    #[error("unsupported COSE curve")]
    UnsupportedCurve,
    /// The COSE public key used a key type other than EC2.
    #[error("unsupported COSE key type")]
    UnsupportedKeyType,
    /// An EC coordinate was missing or had the wrong length.
    #[error("malformed EC point coordinate")]
    MalformedCoordinate,
}

impl Fido2ParseError {
    pub(crate) fn cbor<E: std::fmt::Display>(err: E) -> Self {
        Self::InvalidCbor(err.to_string())
    }
}
