use thiserror::Error;

/// Errors produced by the cryptographic primitives.
///
/// All variants are recoverable and reported to the caller; none of them
/// should abort a request. [`CryptoError::DecryptFailed`] deliberately does
/// not say whether the context or the ciphertext was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// A key could not be decoded, or was on the wrong curve.
    #[error("invalid key format")]
    InvalidKeyFormat,
    /// A sealed value could not be opened. Covers both a wrong context and
    /// corrupted data, without distinguishing the two.
    #[error("could not open sealed value")]
    DecryptFailed,
    /// Sealing a value failed.
    #[error("could not seal value")]
    EncryptFailed,
    /// A sealed value was stored with `AesHmac` mode but no master database
    /// encryption key is configured.
    #[error("master database encryption key is not configured")]
    MissingMasterKey,
    /// Counter data did not have the expected length.
    #[error("counter data must be {expected} bytes, got {actual}")]
    InvalidCounterData {
        /// Required counter data length.
        expected: usize,
        /// Length that was provided.
        actual: usize,
    },
}
