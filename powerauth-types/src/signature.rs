//! Multi-factor signature types and the data accompanying a verification
//! request.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Closed set of factor combinations a PowerAuth signature can be computed
/// with.
///
/// Offline verification tries an ordered list of candidates and the first
/// matching type wins; online verification always uses a single type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SignatureType {
    /// Device possession only (1FA).
    Possession,
    /// Knowledge factor only, e.g. a PIN (1FA). Only valid combined with
    /// possession in practice, kept for wire compatibility.
    Knowledge,
    /// Biometry factor only (1FA). See [`SignatureType::Knowledge`].
    Biometry,
    /// Possession plus knowledge (2FA).
    PossessionKnowledge,
    /// Possession plus biometry (2FA).
    PossessionBiometry,
    /// Possession, knowledge and biometry (3FA).
    PossessionKnowledgeBiometry,
}

impl SignatureType {
    /// Number of factors participating in this signature type.
    pub fn factor_count(&self) -> usize {
        match self {
            Self::Possession | Self::Knowledge | Self::Biometry => 1,
            Self::PossessionKnowledge | Self::PossessionBiometry => 2,
            Self::PossessionKnowledgeBiometry => 3,
        }
    }

    /// Whether the type includes a factor beyond device possession. Failed
    /// attempts with such types count toward blocking the activation.
    pub fn has_non_possession_factor(&self) -> bool {
        !matches!(self, Self::Possession)
    }
}

/// Canonical string form of a signature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureFormat {
    /// Dash-joined groups of eight decimal digits, one group per factor.
    /// Used by offline signatures typed in by the user.
    Decimal,
    /// Base64 of the raw signature component bytes.
    Base64,
}

/// Input to a signature verification: the signed bytes, the claimed
/// signature, and request metadata.
#[derive(Debug, Clone)]
pub struct SignatureData {
    /// Raw bytes the client signed, in the canonical
    /// `METHOD&URI&NONCE&BODY&APP_SECRET` concatenation.
    pub data: Vec<u8>,
    /// Claimed signature string, in `format`.
    pub signature: String,
    /// How `signature` is encoded.
    pub format: SignatureFormat,
    /// Additional key-value information recorded with the audit entry.
    pub additional_info: Vec<(String, String)>,
    /// Explicit signature version agreed during a protocol upgrade window.
    /// Verifying with the wrong counter representation fails, it is never
    /// coerced.
    pub forced_signature_version: Option<u32>,
}

impl SignatureData {
    /// Signature data carrying only the signed bytes and the claimed
    /// signature, with no upgrade override.
    pub fn new(data: Vec<u8>, signature: String, format: SignatureFormat) -> Self {
        Self {
            data,
            signature,
            format,
            additional_info: Vec::new(),
            forced_signature_version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(SignatureType::PossessionKnowledge.to_string(), "possession_knowledge");
        assert_eq!(
            "possession_biometry".parse::<SignatureType>().unwrap(),
            SignatureType::PossessionBiometry
        );
    }

    #[test]
    fn factor_counts() {
        for ty in SignatureType::iter() {
            let expected = ty.to_string().split('_').count();
            assert_eq!(ty.factor_count(), expected);
        }
    }

    #[test]
    fn possession_is_the_only_pure_possession_type() {
        assert!(!SignatureType::Possession.has_non_possession_factor());
        assert!(SignatureType::PossessionKnowledgeBiometry.has_non_possession_factor());
    }
}
