//! # PowerAuth FIDO2
//!
//! WebAuthn/FIDO2 support for the PowerAuth server core: decoding of
//! untrusted client payloads ([`AuthenticatorData`], [`AttestationObject`],
//! [`CollectedClientData`]), the registration and assertion ceremony
//! validators, and the AAGUID registry that maps authenticator models onto
//! PowerAuth signature types.
//!
//! All parsers are read-only transformations over attacker-supplied bytes:
//! every length field is bounds-checked against the actual buffer before any
//! allocation, and malformed input yields a typed [`Fido2ParseError`], never
//! a panic or an out-of-bounds read.

mod aaguid;
mod attestation;
mod authenticator_data;
mod client_data;
mod default_authenticators;
mod error;
mod flags;
pub mod registry;
pub mod validator;

pub use self::{
    aaguid::Aaguid,
    attestation::{AttestationFormat, AttestationObject, AttestationStatement},
    authenticator_data::{AttestedCredentialData, AuthenticatorData, PublicKeyObject},
    client_data::CollectedClientData,
    error::Fido2ParseError,
    flags::Flags,
    registry::{AuthenticatorOverrides, AuthenticatorRegistry, Fido2Authenticator, NoOverrides},
    validator::{validate_assertion, validate_registration, AssertionRequest, RegistrationRequest},
};

use sha2::{Digest, Sha256};

/// SHA-256 of the given `data`.
pub(crate) fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}
