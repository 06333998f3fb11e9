//! Append-only signature audit record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signature::SignatureType;

/// One row of the signature audit log.
///
/// A record is created for every verification attempt, valid or not, and is
/// never mutated afterwards. The counter values before and after the attempt
/// make the replay-window diagnosis possible after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureAuditRecord {
    /// Activation the attempt was made against.
    pub activation_id: String,
    /// User owning the activation.
    pub user_id: String,
    /// Application owning the activation.
    pub application_id: String,
    /// Signature type attempted, or the type that matched.
    pub signature_type: SignatureType,
    /// Claimed signature string as received.
    pub signature: String,
    /// Base64 of the raw signed data.
    pub data_base64: String,
    /// Whether the signature verified.
    pub valid: bool,
    /// Numeric counter before the attempt.
    pub counter_before: u64,
    /// Numeric counter after the attempt.
    pub counter_after: u64,
    /// Hash-chain counter data before the attempt, base64, if the activation
    /// uses protocol version 3.
    pub ctr_data_before: Option<String>,
    /// Protocol version the signature was verified with.
    pub signature_version: u32,
    /// Free-text note, see [`note`] for the values the engine emits.
    pub note: String,
    /// Additional key-value pairs from the request.
    pub additional_info: Vec<(String, String)>,
    /// When the attempt happened.
    pub timestamp: DateTime<Utc>,
}

/// Audit note values emitted by the verification engine.
pub mod note {
    /// Signature matched.
    pub const SIGNATURE_OK: &str = "signature_ok";
    /// No counter offset in the lookahead window matched.
    pub const SIGNATURE_DOES_NOT_MATCH: &str = "signature_does_not_match";
    /// Verification attempted against an activation that is not active.
    pub const ACTIVATION_INVALID_STATE: &str = "activation_invalid_state";
}
