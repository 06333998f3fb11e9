//! The activation entity and its lifecycle enums.
//!
//! An activation is the registered binding between a user's device key pair
//! and the server. The engine mutates it only under the per-activation
//! exclusive critical section provided by the storage collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use zeroize::Zeroize;

/// Lifecycle status of an [`Activation`].
///
/// `Removed` is terminal; see `powerauth-engine` for the allowed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    /// Activation record exists, the device has not yet sent its public key.
    Created,
    /// Device public key was exchanged, waiting for the commit step.
    PendingCommit,
    /// Activation is fully usable for signature verification.
    Active,
    /// Activation is temporarily blocked, e.g. after too many failed attempts.
    Blocked,
    /// Terminal state. A removed activation never becomes usable again.
    Removed,
}

/// Determines when a [`ActivationStatus::PendingCommit`] activation moves to
/// [`ActivationStatus::Active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitPhase {
    /// Commit happens as an explicit second step.
    OnCommit,
    /// Commit is folded into the key-exchange step.
    OnKeyExchange,
}

/// Protocol family the activation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivationProtocol {
    /// Mobile/desktop application enrolled via the PowerAuth key exchange.
    PowerAuth,
    /// WebAuthn credential mapped onto the activation model.
    Fido2,
}

/// Storage encryption mode of server-side secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionMode {
    /// Value is stored as-is.
    NoEncryption,
    /// Value is sealed with a per-record key derived from the master database
    /// encryption key and the record's context (user ID, activation ID).
    AesHmac,
}

/// A value stored either in plaintext or sealed, together with the mode that
/// tells the vault codec how to read it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct EncryptedValue {
    /// How `data` is protected at rest.
    #[zeroize(skip)]
    pub mode: EncryptionMode,
    /// Plaintext or ciphertext bytes, depending on `mode`.
    pub data: Vec<u8>,
}

/// The central entity: a registered binding between a device key pair and the
/// server, with replay-protection state and failure accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// Opaque unique identifier.
    pub activation_id: String,
    /// Application the activation belongs to.
    pub application_id: String,
    /// User the activation belongs to.
    pub user_id: String,

    /// Server private key at rest, possibly sealed. Decrypting requires the
    /// record context; a wrong context fails closed.
    pub server_private_key: EncryptedValue,
    /// Server public key, SEC1-encoded point.
    pub server_public_key: Vec<u8>,
    /// Device public key, SEC1-encoded point. Set exactly once during key
    /// exchange and immutable afterwards.
    pub device_public_key: Option<Vec<u8>>,

    /// Legacy monotonic counter, used by protocol version 2 signatures and by
    /// FIDO2 sign-count tracking.
    pub counter: u64,
    /// Hash-chain counter data, used from protocol version 3 onward.
    pub ctr_data: Option<Vec<u8>>,
    /// Protocol version of the activation (2 or 3).
    pub version: u32,

    /// Current lifecycle status.
    pub status: ActivationStatus,
    /// When the pending activation becomes active.
    pub commit_phase: CommitPhase,
    /// Reason recorded when the activation was blocked.
    pub blocked_reason: Option<String>,

    /// Consecutive failed verification attempts since the last success.
    pub failed_attempts: u64,
    /// Threshold at which a failed verification blocks the activation.
    pub max_failed_attempts: u64,

    /// Creation timestamp.
    pub timestamp_created: DateTime<Utc>,
    /// Deadline for finishing the activation process; only meaningful while
    /// the activation is `Created` or `PendingCommit`.
    pub timestamp_activation_expire: DateTime<Utc>,
    /// Last signature verification attempt, successful or not.
    pub timestamp_last_used: DateTime<Utc>,

    /// Client platform, e.g. `ios` or `android`.
    pub platform: Option<String>,
    /// Free-form device description supplied during activation.
    pub device_info: Option<String>,
    /// Protocol family.
    pub protocol: ActivationProtocol,
    /// Arbitrary string tags gating operation visibility.
    pub flags: Vec<String>,
}

impl Activation {
    /// Remaining failed attempts before the activation gets blocked.
    pub fn remaining_attempts(&self) -> u64 {
        self.max_failed_attempts.saturating_sub(self.failed_attempts)
    }

    /// Whether the activation process deadline has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.timestamp_activation_expire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_forms_match_wire_values() {
        assert_eq!(ActivationStatus::PendingCommit.to_string(), "PENDING_COMMIT");
        assert_eq!(
            "REMOVED".parse::<ActivationStatus>().unwrap(),
            ActivationStatus::Removed
        );
    }

    #[test]
    fn protocol_string_forms_are_lowercase() {
        assert_eq!(ActivationProtocol::PowerAuth.to_string(), "powerauth");
        assert_eq!(
            "fido2".parse::<ActivationProtocol>().unwrap(),
            ActivationProtocol::Fido2
        );
    }

    #[test]
    fn remaining_attempts_saturates_at_zero() {
        let mut activation = test_support::active_activation();
        activation.failed_attempts = 7;
        activation.max_failed_attempts = 5;
        assert_eq!(activation.remaining_attempts(), 0);
    }
}

#[cfg(any(test, feature = "testable"))]
pub mod test_support {
    //! Builders for tests across the workspace.

    use chrono::TimeZone;

    use super::*;

    /// A plain active activation with a v3 hash-chain counter and no sealed
    /// key material.
    pub fn active_activation() -> Activation {
        let created = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        Activation {
            activation_id: "test-activation-1".into(),
            application_id: "app-1".into(),
            user_id: "user-1".into(),
            server_private_key: EncryptedValue {
                mode: EncryptionMode::NoEncryption,
                data: Vec::new(),
            },
            server_public_key: Vec::new(),
            device_public_key: None,
            counter: 0,
            ctr_data: None,
            version: 3,
            status: ActivationStatus::Active,
            commit_phase: CommitPhase::OnCommit,
            blocked_reason: None,
            failed_attempts: 0,
            max_failed_attempts: 5,
            timestamp_created: created,
            timestamp_activation_expire: created + chrono::Duration::minutes(5),
            timestamp_last_used: created,
            platform: Some("ios".into()),
            device_info: Some("iPhone 15".into()),
            protocol: ActivationProtocol::PowerAuth,
            flags: Vec::new(),
        }
    }
}
