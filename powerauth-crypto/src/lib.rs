//! # PowerAuth Crypto
//!
//! Pure cryptographic primitives of the PowerAuth server core. Everything in
//! this crate is deterministic for fixed inputs (except IV/seed generation)
//! and performs no I/O, which makes it safe to call inside the storage
//! collaborator's per-activation critical section.
//!
//! The pieces, bottom up:
//!
//! - [`kdf`] — one-way key derivation with fixed domain-separation indices.
//! - [`keys`] — ECDH over P-256 producing the master secret, the transport
//!   key and the per-factor signature keys.
//! - [`counter`] — the hash-based replay-protection counter used from
//!   protocol version 3 onward.
//! - [`signature`] — multi-factor signature computation and verification in
//!   the decimal and Base64 canonical forms.
//! - [`vault`] — the encrypted-blob codec sealing server-side key material
//!   under a context-bound record key.
//!
//! ## Why RustCrypto?
//!
//! The pure-Rust [RustCrypto] implementations keep the crate free of any
//! linkage to a platform crypto provider, and their types make key sizes a
//! compile-time property rather than a runtime check.
//!
//! [RustCrypto]: https://github.com/RustCrypto

pub mod counter;
mod error;
pub mod kdf;
pub mod keys;
pub mod signature;
pub mod vault;

pub use self::{error::CryptoError, kdf::DerivedKey, vault::Vault};

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// HMAC-SHA256 of `data` under `key`.
pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    // SAFETY: HMAC accepts keys of any length, new_from_slice cannot fail.
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key).unwrap();
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// SHA-256 of the given `data`.
pub(crate) fn sha256(data: &[u8]) -> [u8; 32] {
    use sha2::Digest;
    Sha256::digest(data).into()
}
