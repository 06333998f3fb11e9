//! Activation lifecycle state machine.
//!
//! Allowed transitions:
//!
//! ```text
//! CREATED --(device key exchange)--> PENDING_COMMIT --(commit)--> ACTIVE
//!                                           |  (commit_phase = ON_KEY_EXCHANGE
//!                                           |   folds the commit into the
//!                                           |   key-exchange step)
//! ACTIVE <--(unblock)-- BLOCKED <--(block)-- ACTIVE
//! any non-REMOVED --(remove)--> REMOVED        (terminal, idempotent)
//! CREATED | PENDING_COMMIT --(expiry sweep)--> REMOVED
//! ```
//!
//! Every function here mutates an activation the caller loaded under the
//! store's per-ID exclusive critical section.

use chrono::{DateTime, Utc};

use powerauth_types::{Activation, ActivationStatus, CommitPhase};

use crate::{
    ports::{ActivationStore, Clock},
    EngineError,
};

/// Blocked reason recorded when the failure threshold auto-blocks an
/// activation.
pub const BLOCKED_REASON_MAX_FAILED_ATTEMPTS: &str = "MAX_FAILED_ATTEMPTS";

/// Store the device public key, moving `Created` to `PendingCommit`.
///
/// The key is set exactly once and immutable afterwards. With
/// [`CommitPhase::OnKeyExchange`] the commit is folded in and the activation
/// goes straight to `Active`.
pub fn exchange_device_key(
    activation: &mut Activation,
    device_public_key: Vec<u8>,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    if activation.status != ActivationStatus::Created {
        return Err(incorrect_state(activation));
    }
    if activation.is_expired(now) {
        return Err(EngineError::ActivationExpired(activation.activation_id.clone()));
    }
    if activation.device_public_key.is_some() {
        return Err(EngineError::DevicePublicKeyAlreadySet(
            activation.activation_id.clone(),
        ));
    }

    activation.device_public_key = Some(device_public_key);
    activation.status = match activation.commit_phase {
        CommitPhase::OnCommit => ActivationStatus::PendingCommit,
        CommitPhase::OnKeyExchange => ActivationStatus::Active,
    };
    Ok(())
}

/// Commit a pending activation, moving `PendingCommit` to `Active`.
pub fn commit(activation: &mut Activation, now: DateTime<Utc>) -> Result<(), EngineError> {
    if activation.status != ActivationStatus::PendingCommit {
        return Err(incorrect_state(activation));
    }
    if activation.is_expired(now) {
        return Err(EngineError::ActivationExpired(activation.activation_id.clone()));
    }
    activation.status = ActivationStatus::Active;
    Ok(())
}

/// Block an active activation, recording `reason`.
pub fn block(activation: &mut Activation, reason: &str) -> Result<(), EngineError> {
    if activation.status != ActivationStatus::Active {
        return Err(incorrect_state(activation));
    }
    activation.status = ActivationStatus::Blocked;
    activation.blocked_reason = Some(reason.to_owned());
    Ok(())
}

/// Unblock a blocked activation, resetting the failure count.
pub fn unblock(activation: &mut Activation) -> Result<(), EngineError> {
    if activation.status != ActivationStatus::Blocked {
        return Err(incorrect_state(activation));
    }
    activation.status = ActivationStatus::Active;
    activation.blocked_reason = None;
    activation.failed_attempts = 0;
    Ok(())
}

/// Remove an activation. `Removed` is terminal; removing an already removed
/// activation is a no-op success.
pub fn remove(activation: &mut Activation) -> Result<(), EngineError> {
    activation.status = ActivationStatus::Removed;
    Ok(())
}

/// Expiry sweep: remove every `Created`/`PendingCommit` activation past its
/// activation-process deadline. Returns how many were removed.
///
/// This is the only path that changes state without an explicit client
/// action; a scheduler in the host invokes it periodically.
pub fn expire_activations<S: ActivationStore, C: Clock>(store: &S, clock: &C) -> usize {
    let now = clock.now();
    let mut removed = 0;
    for mut activation in store.pending_activations() {
        if activation.is_expired(now) {
            activation.status = ActivationStatus::Removed;
            store.save(&activation);
            removed += 1;
        }
    }
    if removed > 0 {
        log::info!("expired {removed} incomplete activations");
    }
    removed
}

fn incorrect_state(activation: &Activation) -> EngineError {
    EngineError::ActivationIncorrectState {
        activation_id: activation.activation_id.clone(),
        status: activation.status,
    }
}
