//! Encrypted-blob codec for server-side secret material.
//!
//! Server private keys and recovery PUKs are stored either in plaintext
//! (`NoEncryption`, for deployments without a master database encryption
//! key) or sealed under a per-record key derived from the master key and the
//! record's context. Binding the record key to the context means the
//! ciphertext of one activation is useless for another: opening with the
//! wrong context fails closed, indistinguishable from corrupted data.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::Zeroizing;

use powerauth_types::{EncryptedValue, EncryptionMode};

use crate::{hmac_sha256, CryptoError};

const NONCE_LEN: usize = 12;

/// The encrypted-blob codec. Holds the optional master database encryption
/// key; without one, values pass through unencrypted.
pub struct Vault {
    master_key: Option<Zeroizing<Vec<u8>>>,
}

impl Vault {
    /// Create a vault. `master_key` is the raw master database encryption
    /// key, or `None` to store values unencrypted.
    pub fn new(master_key: Option<Vec<u8>>) -> Self {
        Self {
            master_key: master_key.map(Zeroizing::new),
        }
    }

    /// A vault without a master key, storing everything in plaintext.
    pub fn unencrypted() -> Self {
        Self::new(None)
    }

    /// Seal `plain` bound to `context`.
    ///
    /// The context parts identify the record, e.g. `[user_id,
    /// activation_id]` for a server private key or `[application_id,
    /// user_id, recovery_code, puk_index]` for a PUK.
    pub fn seal(&self, plain: &[u8], context: &[&str]) -> Result<EncryptedValue, CryptoError> {
        let Some(master_key) = &self.master_key else {
            return Ok(EncryptedValue {
                mode: EncryptionMode::NoEncryption,
                data: plain.to_vec(),
            });
        };

        let record_key = record_key(master_key, context);
        // SAFETY: the record key is always 32 bytes.
        let cipher = Aes256Gcm::new_from_slice(&record_key).unwrap();

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plain)
            .map_err(|_| CryptoError::EncryptFailed)?;

        let mut data = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        data.extend_from_slice(&nonce_bytes);
        data.extend_from_slice(&ciphertext);
        Ok(EncryptedValue {
            mode: EncryptionMode::AesHmac,
            data,
        })
    }

    /// Open a stored value bound to `context`.
    ///
    /// Any mismatch — wrong context, wrong master key, truncated or tampered
    /// data — fails with the same [`CryptoError::DecryptFailed`].
    pub fn open(&self, value: &EncryptedValue, context: &[&str]) -> Result<Vec<u8>, CryptoError> {
        match value.mode {
            EncryptionMode::NoEncryption => Ok(value.data.clone()),
            EncryptionMode::AesHmac => {
                let master_key = self.master_key.as_ref().ok_or(CryptoError::MissingMasterKey)?;
                if value.data.len() < NONCE_LEN {
                    return Err(CryptoError::DecryptFailed);
                }
                let (nonce_bytes, ciphertext) = value.data.split_at(NONCE_LEN);
                let record_key = record_key(master_key, context);
                // SAFETY: the record key is always 32 bytes.
                let cipher = Aes256Gcm::new_from_slice(&record_key).unwrap();
                cipher
                    .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
                    .map_err(|_| CryptoError::DecryptFailed)
            }
        }
    }
}

/// Per-record key: HMAC-SHA256 of the `&`-joined context under the master
/// key. Distinct contexts give unrelated keys.
fn record_key(master_key: &[u8], context: &[&str]) -> [u8; 32] {
    hmac_sha256(master_key, context.join("&").as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> Vault {
        Vault::new(Some(vec![0x24; 16]))
    }

    #[test]
    fn seal_and_open_round_trip() {
        let vault = vault();
        let context = ["user-1", "activation-1"];
        let sealed = vault.seal(b"private key bytes", &context).unwrap();
        assert_eq!(sealed.mode, EncryptionMode::AesHmac);
        assert_eq!(vault.open(&sealed, &context).unwrap(), b"private key bytes");
    }

    #[test]
    fn wrong_context_fails_closed() {
        let vault = vault();
        let sealed = vault.seal(b"secret", &["user-1", "activation-1"]).unwrap();
        assert_eq!(
            vault.open(&sealed, &["user-1", "activation-2"]).unwrap_err(),
            CryptoError::DecryptFailed
        );
    }

    #[test]
    fn tampered_ciphertext_fails_the_same_way() {
        let vault = vault();
        let context = ["user-1", "activation-1"];
        let mut sealed = vault.seal(b"secret", &context).unwrap();
        let last = sealed.data.len() - 1;
        sealed.data[last] ^= 0x01;
        assert_eq!(
            vault.open(&sealed, &context).unwrap_err(),
            CryptoError::DecryptFailed
        );
    }

    #[test]
    fn truncated_value_fails_the_same_way() {
        let vault = vault();
        let sealed = EncryptedValue {
            mode: EncryptionMode::AesHmac,
            data: vec![1, 2, 3],
        };
        assert_eq!(
            vault.open(&sealed, &["a"]).unwrap_err(),
            CryptoError::DecryptFailed
        );
    }

    #[test]
    fn no_master_key_passes_through() {
        let vault = Vault::unencrypted();
        let sealed = vault.seal(b"plain", &["ctx"]).unwrap();
        assert_eq!(sealed.mode, EncryptionMode::NoEncryption);
        assert_eq!(sealed.data, b"plain");
        assert_eq!(vault.open(&sealed, &["ctx"]).unwrap(), b"plain");
    }

    #[test]
    fn aes_hmac_value_without_master_key_reports_missing_key() {
        let sealing_vault = vault();
        let sealed = sealing_vault.seal(b"secret", &["ctx"]).unwrap();
        let reading_vault = Vault::unencrypted();
        assert_eq!(
            reading_vault.open(&sealed, &["ctx"]).unwrap_err(),
            CryptoError::MissingMasterKey
        );
    }
}
