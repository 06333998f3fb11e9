//! Recovery code and PUK model.
//!
//! A recovery code carries a fixed set of single-use PUKs. Each PUK is stored
//! sealed, keyed by its position; consuming one marks it used. A used PUK
//! must be reported distinctly from an invalid one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::activation::EncryptedValue;

/// Lifecycle status of a recovery code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryCodeStatus {
    /// Code was generated but not yet confirmed by the user.
    Created,
    /// Code is usable for recovery.
    Active,
    /// Code is blocked after too many failed PUK attempts.
    Blocked,
    /// Code was revoked and can never be used again.
    Revoked,
}

/// Lifecycle status of a single PUK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryPukStatus {
    /// PUK has not been used yet.
    Valid,
    /// PUK was consumed. Subsequent use reports "already used".
    Used,
    /// PUK was invalidated without being used, e.g. by revoking the code.
    Invalid,
}

/// One single-use personal unblocking key.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryPuk {
    /// Position of the PUK within its recovery code, starting at 1.
    pub puk_index: u64,
    /// Sealed PUK value. The vault context binds it to
    /// `(application_id, user_id, recovery_code, puk_index)`.
    pub puk: EncryptedValue,
    /// Current status.
    pub status: RecoveryPukStatus,
    /// Last status change.
    pub timestamp_last_change: Option<DateTime<Utc>>,
}

/// A recovery code with its PUKs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryCode {
    /// Application the code belongs to.
    pub application_id: String,
    /// User the code belongs to.
    pub user_id: String,
    /// Activation the code was issued for, if activation-scoped.
    pub activation_id: Option<String>,
    /// The code value in its canonical masked form.
    pub recovery_code: String,
    /// Current status.
    pub status: RecoveryCodeStatus,
    /// Consecutive failed PUK attempts.
    pub failed_attempts: u64,
    /// Threshold at which the code gets blocked.
    pub max_failed_attempts: u64,
    /// Creation timestamp.
    pub timestamp_created: DateTime<Utc>,
    /// PUKs ordered by index.
    pub puks: Vec<RecoveryPuk>,
}

impl RecoveryCode {
    /// Find a PUK by its one-based index.
    pub fn puk(&self, puk_index: u64) -> Option<&RecoveryPuk> {
        self.puks.iter().find(|p| p.puk_index == puk_index)
    }

    /// Mutable access to a PUK by its one-based index.
    pub fn puk_mut(&mut self, puk_index: u64) -> Option<&mut RecoveryPuk> {
        self.puks.iter_mut().find(|p| p.puk_index == puk_index)
    }

    /// Index of the next PUK still valid for use, if any.
    pub fn next_valid_puk_index(&self) -> Option<u64> {
        self.puks
            .iter()
            .find(|p| p.status == RecoveryPukStatus::Valid)
            .map(|p| p.puk_index)
    }
}
