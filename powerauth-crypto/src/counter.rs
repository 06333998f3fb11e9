//! Hash-based replay-protection counter.
//!
//! Protocol version 3 replaces the plain numeric counter with a 16-byte
//! value advanced through a one-way hash chain. The next value cannot be
//! predicted without re-deriving the chain, which is why the verifier walks
//! the chain forward during the lookahead search instead of computing an
//! offset directly.

use rand::RngCore;

use crate::{sha256, CryptoError};

/// Length of the hash-based counter data, in bytes.
pub const CTR_DATA_LEN: usize = 16;

/// Generate a fresh random counter seed.
pub fn init() -> [u8; CTR_DATA_LEN] {
    let mut seed = [0u8; CTR_DATA_LEN];
    rand::thread_rng().fill_bytes(&mut seed);
    seed
}

/// Advance the counter by one step of the hash chain.
///
/// The next value is the 16-byte prefix of SHA-256 over the current value.
pub fn next(ctr_data: &[u8]) -> Result<[u8; CTR_DATA_LEN], CryptoError> {
    if ctr_data.len() != CTR_DATA_LEN {
        return Err(CryptoError::InvalidCounterData {
            expected: CTR_DATA_LEN,
            actual: ctr_data.len(),
        });
    }
    let digest = sha256(ctr_data);
    // SAFETY: a SHA-256 digest is 32 bytes, the 16-byte prefix always exists.
    Ok(digest[..CTR_DATA_LEN].try_into().unwrap())
}

/// Encode a numeric counter value into the 16-byte counter block used by
/// protocol version 2 signatures.
pub fn from_numeric(counter: u64) -> [u8; CTR_DATA_LEN] {
    let mut block = [0u8; CTR_DATA_LEN];
    block[8..].copy_from_slice(&counter.to_be_bytes());
    block
}
