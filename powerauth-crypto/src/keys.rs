//! ECDH key agreement and factor-key derivation.
//!
//! The server private key and the device public key agree on a 16-byte
//! master secret, from which the transport key and the per-factor signature
//! keys are derived with fixed indices. All functions here are pure.

use p256::{PublicKey, SecretKey};
use powerauth_types::SignatureType;

use crate::{
    kdf::{
        self, DerivedKey, INDEX_SIGNATURE_BIOMETRY, INDEX_SIGNATURE_KNOWLEDGE,
        INDEX_SIGNATURE_POSSESSION, INDEX_TRANSPORT, KEY_LEN,
    },
    CryptoError,
};

/// Decode a P-256 private key from its raw 32-byte scalar.
pub fn private_key_from_bytes(bytes: &[u8]) -> Result<SecretKey, CryptoError> {
    SecretKey::from_slice(bytes).map_err(|_| CryptoError::InvalidKeyFormat)
}

/// Decode a P-256 public key from a SEC1-encoded point, compressed or not.
///
/// A point on a different curve, or bytes that are not a point at all, fail
/// with [`CryptoError::InvalidKeyFormat`].
pub fn public_key_from_bytes(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    PublicKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidKeyFormat)
}

/// Compute the ECDH master secret from the two keys.
///
/// The 32-byte shared x-coordinate is folded to [`KEY_LEN`] bytes by XOR-ing
/// its halves.
pub fn master_secret(private: &SecretKey, public: &PublicKey) -> DerivedKey {
    let shared = p256::ecdh::diffie_hellman(private.to_nonzero_scalar(), public.as_affine());
    let raw = shared.raw_secret_bytes();
    let mut folded = [0u8; KEY_LEN];
    for (i, byte) in folded.iter_mut().enumerate() {
        *byte = raw[i] ^ raw[i + KEY_LEN];
    }
    DerivedKey::from_bytes(folded)
}

/// Derive the transport key from encoded key material.
///
/// Deterministic: calling this twice with identical inputs yields identical
/// key bytes.
pub fn derive_transport_key(
    server_private_key: &[u8],
    device_public_key: &[u8],
) -> Result<DerivedKey, CryptoError> {
    let private = private_key_from_bytes(server_private_key)?;
    let public = public_key_from_bytes(device_public_key)?;
    Ok(kdf::derive(&master_secret(&private, &public), INDEX_TRANSPORT))
}

/// Derive the ordered signature keys for a signature type.
///
/// The order matters: the signature components cascade, so possession always
/// comes first, then knowledge, then biometry.
pub fn signature_keys(master: &DerivedKey, signature_type: SignatureType) -> Vec<DerivedKey> {
    let indices: &[u64] = match signature_type {
        SignatureType::Possession => &[INDEX_SIGNATURE_POSSESSION],
        SignatureType::Knowledge => &[INDEX_SIGNATURE_KNOWLEDGE],
        SignatureType::Biometry => &[INDEX_SIGNATURE_BIOMETRY],
        SignatureType::PossessionKnowledge => {
            &[INDEX_SIGNATURE_POSSESSION, INDEX_SIGNATURE_KNOWLEDGE]
        }
        SignatureType::PossessionBiometry => {
            &[INDEX_SIGNATURE_POSSESSION, INDEX_SIGNATURE_BIOMETRY]
        }
        SignatureType::PossessionKnowledgeBiometry => &[
            INDEX_SIGNATURE_POSSESSION,
            INDEX_SIGNATURE_KNOWLEDGE,
            INDEX_SIGNATURE_BIOMETRY,
        ],
    };
    indices.iter().map(|index| kdf::derive(master, *index)).collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::OsRng;

    use super::*;

    fn key_pair() -> (SecretKey, PublicKey) {
        let private = SecretKey::random(&mut OsRng);
        let public = private.public_key();
        (private, public)
    }

    #[test]
    fn transport_key_is_deterministic() {
        let (server_private, _) = key_pair();
        let (_, device_public) = key_pair();
        let private_bytes = server_private.to_bytes();
        let public_bytes = device_public.to_sec1_bytes();

        let first = derive_transport_key(&private_bytes, &public_bytes).unwrap();
        let second = derive_transport_key(&private_bytes, &public_bytes).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn ecdh_agrees_in_both_directions() {
        let (server_private, server_public) = key_pair();
        let (device_private, device_public) = key_pair();

        let server_side = master_secret(&server_private, &device_public);
        let device_side = master_secret(&device_private, &server_public);
        assert_eq!(server_side.as_bytes(), device_side.as_bytes());
    }

    #[test]
    fn garbage_key_bytes_fail_with_invalid_key_format() {
        assert_eq!(
            private_key_from_bytes(&[0u8; 5]).unwrap_err(),
            CryptoError::InvalidKeyFormat
        );
        assert_eq!(
            public_key_from_bytes(&[0xAB; 40]).unwrap_err(),
            CryptoError::InvalidKeyFormat
        );
    }

    #[test]
    fn signature_key_count_follows_factor_count() {
        let master = DerivedKey::from_bytes([7; KEY_LEN]);
        assert_eq!(signature_keys(&master, SignatureType::Possession).len(), 1);
        assert_eq!(
            signature_keys(&master, SignatureType::PossessionKnowledge).len(),
            2
        );
        assert_eq!(
            signature_keys(&master, SignatureType::PossessionKnowledgeBiometry).len(),
            3
        );
    }
}
