//! # PowerAuth Types
//!
//! Type definitions shared by the PowerAuth server core crates: the activation
//! entity with its lifecycle enums, multi-factor signature types and canonical
//! signed-data formats, the append-only signature audit record, and the
//! recovery code / PUK model.
//!
//! Everything in this crate is plain data. Cryptographic operations live in
//! `powerauth-crypto`, state transitions and verification in
//! `powerauth-engine`.

pub mod activation;
pub mod audit;
pub mod encoding;
pub mod recovery;
pub mod request;
pub mod signature;

pub use self::{
    activation::{Activation, ActivationProtocol, ActivationStatus, CommitPhase, EncryptedValue,
        EncryptionMode},
    audit::SignatureAuditRecord,
    recovery::{RecoveryCode, RecoveryCodeStatus, RecoveryPuk, RecoveryPukStatus},
    request::{RequestParseError, SignatureRequestData},
    signature::{SignatureData, SignatureFormat, SignatureType},
};
