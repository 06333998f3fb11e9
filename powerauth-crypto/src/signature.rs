//! Multi-factor signature computation and verification.
//!
//! A signature is a cascade of HMAC-SHA256 components, one per factor key,
//! bound to the current counter data. Verification recomputes the signature
//! with the same primitive, so the two can never drift apart.

use powerauth_types::{encoding, SignatureFormat};

use crate::{hmac_sha256, kdf::DerivedKey};

/// Number of decimal digits per signature component.
const DECIMAL_DIGITS: u32 = 8;

/// Bytes of each component kept in the Base64 signature form.
const BASE64_COMPONENT_LEN: usize = 16;

/// Compute the signature over `data` with the ordered factor `keys` and the
/// counter block `ctr_data`, rendered in `format`.
pub fn compute(
    data: &[u8],
    keys: &[DerivedKey],
    ctr_data: &[u8],
    format: SignatureFormat,
) -> String {
    let components = component_macs(data, keys, ctr_data);
    match format {
        SignatureFormat::Decimal => components
            .iter()
            .map(|mac| decimal_component(mac))
            .collect::<Vec<_>>()
            .join("-"),
        SignatureFormat::Base64 => {
            let mut bytes = Vec::with_capacity(components.len() * BASE64_COMPONENT_LEN);
            for mac in &components {
                bytes.extend_from_slice(&mac[mac.len() - BASE64_COMPONENT_LEN..]);
            }
            encoding::base64(&bytes)
        }
    }
}

/// Verify a claimed signature against `data`, `keys` and `ctr_data`.
pub fn verify(
    data: &[u8],
    claimed: &str,
    keys: &[DerivedKey],
    ctr_data: &[u8],
    format: SignatureFormat,
) -> bool {
    let expected = compute(data, keys, ctr_data, format);
    // Length leak is harmless: component count is public from the type.
    expected.len() == claimed.len()
        && expected
            .bytes()
            .zip(claimed.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// One MAC per factor key, each cascading over the previous component so a
/// later factor cannot be valid without the earlier ones.
fn component_macs(data: &[u8], keys: &[DerivedKey], ctr_data: &[u8]) -> Vec<[u8; 32]> {
    let mut components: Vec<[u8; 32]> = Vec::with_capacity(keys.len());
    for key in keys {
        let component_key = hmac_sha256(key.as_bytes(), ctr_data);
        let mac = match components.last() {
            None => hmac_sha256(&component_key, data),
            Some(previous) => {
                let mut message = Vec::with_capacity(previous.len() + data.len());
                message.extend_from_slice(previous);
                message.extend_from_slice(data);
                hmac_sha256(&component_key, &message)
            }
        };
        components.push(mac);
    }
    components
}

/// Render one component as eight decimal digits: the last four MAC bytes,
/// sign bit masked off, modulo 10^8.
fn decimal_component(mac: &[u8; 32]) -> String {
    // SAFETY: a SHA-256 MAC is 32 bytes, the 4-byte suffix always exists.
    let tail: [u8; 4] = mac[mac.len() - 4..].try_into().unwrap();
    let value = (u32::from_be_bytes(tail) & 0x7FFF_FFFF) % 10u32.pow(DECIMAL_DIGITS);
    format!("{value:08}")
}
