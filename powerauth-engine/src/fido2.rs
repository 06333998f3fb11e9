//! Bridge between FIDO2 assertions and the activation model.
//!
//! A WebAuthn credential maps onto an activation with
//! [`ActivationProtocol::Fido2`]: the authenticator's signature counter plays
//! the role of the replay counter, and the AAGUID decides which PowerAuth
//! signature type a successful assertion counts as.

use chrono::{DateTime, Utc};

use powerauth_fido2::{registry::AuthenticatorRegistry, Aaguid, AuthenticatorOverrides};
use powerauth_types::{Activation, ActivationProtocol, ActivationStatus, SignatureType};

use crate::{lifecycle::BLOCKED_REASON_MAX_FAILED_ATTEMPTS, EngineError};

/// Result of applying an assertion's signature counter to an activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionOutcome {
    /// Whether the counter advanced within the allowed window.
    pub valid: bool,
    /// Signature type this assertion counts as, resolved from the
    /// authenticator model.
    pub signature_type: SignatureType,
    /// Failed attempts left before the activation gets blocked.
    pub remaining_attempts: u64,
}

/// Apply a validated assertion's `sign_count` to a FIDO2 activation.
///
/// The counter must move strictly forward and stay within `lookahead` skipped
/// values, mirroring the lookahead window of the PowerAuth verifier. The
/// caller runs the ceremony validation first and persists the activation
/// afterwards.
pub fn apply_assertion<O: AuthenticatorOverrides>(
    activation: &mut Activation,
    sign_count: u32,
    aaguid: &Aaguid,
    registry: &AuthenticatorRegistry<O>,
    lookahead: u64,
    now: DateTime<Utc>,
) -> Result<AssertionOutcome, EngineError> {
    if activation.protocol != ActivationProtocol::Fido2 {
        return Err(EngineError::ProtocolMismatch {
            activation_id: activation.activation_id.clone(),
            protocol: activation.protocol,
        });
    }
    if activation.status != ActivationStatus::Active {
        return Err(EngineError::ActivationIncorrectState {
            activation_id: activation.activation_id.clone(),
            status: activation.status,
        });
    }

    let signature_type = registry.lookup(aaguid).signature_type;
    activation.timestamp_last_used = now;

    let received = u64::from(sign_count);
    let valid = received > activation.counter && received <= activation.counter + lookahead + 1;

    if valid {
        activation.counter = received;
        activation.failed_attempts = 0;
    } else {
        log::debug!(
            "assertion sign count {received} outside window for activation {} at counter {}",
            activation.activation_id,
            activation.counter
        );
        activation.failed_attempts += 1;
        if activation.failed_attempts >= activation.max_failed_attempts {
            activation.status = ActivationStatus::Blocked;
            activation.blocked_reason = Some(BLOCKED_REASON_MAX_FAILED_ATTEMPTS.to_owned());
        }
    }

    Ok(AssertionOutcome {
        valid,
        signature_type,
        remaining_attempts: activation.remaining_attempts(),
    })
}
