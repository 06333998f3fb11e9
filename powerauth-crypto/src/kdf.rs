//! One-way key derivation with fixed domain-separation indices.
//!
//! Every key the protocol uses is derived from the ECDH master secret by a
//! single KDF parameterized with an index. The indices are protocol
//! constants; changing one silently breaks interoperability with deployed
//! clients, so they are all collected here.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hmac_sha256;

/// Length of every derived symmetric key, in bytes.
pub const KEY_LEN: usize = 16;

/// Domain-separation index of the possession factor signature key.
pub const INDEX_SIGNATURE_POSSESSION: u64 = 1;
/// Domain-separation index of the knowledge factor signature key.
pub const INDEX_SIGNATURE_KNOWLEDGE: u64 = 2;
/// Domain-separation index of the biometry factor signature key.
pub const INDEX_SIGNATURE_BIOMETRY: u64 = 3;
/// Domain-separation index of the transport key.
pub const INDEX_TRANSPORT: u64 = 1000;
/// Domain-separation index of the vault encryption key.
pub const INDEX_VAULT: u64 = 2000;

/// A 16-byte symmetric key produced by the KDF. Zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey(pub(crate) [u8; KEY_LEN]);

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Read access to the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

// Debug never prints key material.
impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive a key from `secret` for the given domain-separation `index`.
///
/// The construction is HMAC-SHA256 over a 16-byte block carrying the index
/// big-endian, truncated to [`KEY_LEN`]. Deterministic for fixed inputs.
pub fn derive(secret: &DerivedKey, index: u64) -> DerivedKey {
    let mut block = [0u8; KEY_LEN];
    block[8..].copy_from_slice(&index.to_be_bytes());
    let mac = hmac_sha256(&secret.0, &block);
    // SAFETY: a SHA-256 MAC is 32 bytes, the 16-byte prefix always exists.
    DerivedKey(mac[..KEY_LEN].try_into().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let secret = DerivedKey::from_bytes([0x42; KEY_LEN]);
        assert_eq!(
            derive(&secret, INDEX_TRANSPORT).as_bytes(),
            derive(&secret, INDEX_TRANSPORT).as_bytes()
        );
    }

    #[test]
    fn indices_separate_domains() {
        let secret = DerivedKey::from_bytes([0x42; KEY_LEN]);
        let possession = derive(&secret, INDEX_SIGNATURE_POSSESSION);
        let knowledge = derive(&secret, INDEX_SIGNATURE_KNOWLEDGE);
        let transport = derive(&secret, INDEX_TRANSPORT);
        assert_ne!(possession.as_bytes(), knowledge.as_bytes());
        assert_ne!(possession.as_bytes(), transport.as_bytes());
        assert_ne!(knowledge.as_bytes(), transport.as_bytes());
    }

    #[test]
    fn derived_key_debug_hides_material() {
        let secret = DerivedKey::from_bytes([0x42; KEY_LEN]);
        assert_eq!(format!("{secret:?}"), "DerivedKey(..)");
    }
}
