//! Replay-protected multi-factor signature verification.
//!
//! The verifier takes an activation already loaded under the store's
//! per-ID critical section, the signed bytes with the claimed signature, and
//! an ordered list of candidate signature types (one for online requests,
//! several for offline). It derives the factor keys, searches the bounded
//! lookahead window over the counter state, updates the replay and failure
//! state on the activation, and appends exactly one audit record per attempt.
//!
//! Anything that goes wrong mid-verification — unparseable signed data,
//! sealed key material that fails to open, malformed counter state — is an
//! invalid outcome that still gets audited, never an error that skips the
//! audit trail.

use powerauth_crypto::{counter, keys, signature, Vault};
use powerauth_types::{
    audit::note, encoding, Activation, ActivationStatus, SignatureAuditRecord, SignatureData,
    SignatureRequestData, SignatureType,
};

use crate::{
    lifecycle::BLOCKED_REASON_MAX_FAILED_ATTEMPTS,
    ports::{ActivationStore, AuditSink, Clock, SystemClock},
    EngineError,
};

/// Tuning knobs of the verifier.
#[derive(Debug, Clone, Copy)]
pub struct VerifierConfig {
    /// How many counter steps past the stored value are tried before the
    /// signature is declared invalid. Tolerates client retries whose signed
    /// request never reached the server.
    pub lookahead: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self { lookahead: 5 }
    }
}

/// Outcome of one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureVerification {
    /// Whether the claimed signature matched within the lookahead window.
    pub valid: bool,
    /// The candidate type that matched, for a valid signature.
    pub used_signature_type: Option<SignatureType>,
    /// Protocol version the signature was verified with; echoes a forced
    /// version when the request carried one.
    pub signature_version: u32,
    /// Failed attempts left before the activation gets blocked.
    pub remaining_attempts: u64,
    /// Activation status after the attempt, `Blocked` when this failure hit
    /// the threshold.
    pub activation_status: ActivationStatus,
}

/// The signature verification engine.
pub struct SignatureVerifier<A, C = SystemClock> {
    vault: Vault,
    audit: A,
    clock: C,
    config: VerifierConfig,
}

impl<A: AuditSink> SignatureVerifier<A> {
    /// Verifier with the system clock and default configuration.
    pub fn new(vault: Vault, audit: A) -> Self {
        Self::with_clock(vault, audit, SystemClock, VerifierConfig::default())
    }
}

impl<A: AuditSink, C: Clock> SignatureVerifier<A, C> {
    /// Verifier with an explicit clock and configuration.
    pub fn with_clock(vault: Vault, audit: A, clock: C, config: VerifierConfig) -> Self {
        Self {
            vault,
            audit,
            clock,
            config,
        }
    }

    /// The audit sink the verifier appends to.
    pub fn audit_sink(&self) -> &A {
        &self.audit
    }

    /// Verify a signature against an activation loaded under lock.
    ///
    /// Mutates the activation's counter state, failure count and, at the
    /// failure threshold, its status. The caller persists the activation
    /// afterwards within the same critical section.
    pub fn verify(
        &self,
        activation: &mut Activation,
        data: &SignatureData,
        candidates: &[SignatureType],
    ) -> SignatureVerification {
        let now = self.clock.now();
        let counter_before = activation.counter;
        let ctr_data_before = activation.ctr_data.as_deref().map(encoding::base64);
        let version = data.forced_signature_version.unwrap_or(activation.version);
        let attempted_type = candidates.first().copied().unwrap_or(SignatureType::Possession);

        activation.timestamp_last_used = now;

        if activation.status != ActivationStatus::Active {
            log::debug!(
                "rejecting signature for activation {} in state {}",
                activation.activation_id,
                activation.status
            );
            self.audit.record(SignatureAuditRecord {
                activation_id: activation.activation_id.clone(),
                user_id: activation.user_id.clone(),
                application_id: activation.application_id.clone(),
                signature_type: attempted_type,
                signature: data.signature.clone(),
                data_base64: encoding::base64(&data.data),
                valid: false,
                counter_before,
                counter_after: activation.counter,
                ctr_data_before,
                signature_version: version,
                note: note::ACTIVATION_INVALID_STATE.to_owned(),
                additional_info: data.additional_info.clone(),
                timestamp: now,
            });
            return SignatureVerification {
                valid: false,
                used_signature_type: None,
                signature_version: version,
                remaining_attempts: activation.remaining_attempts(),
                activation_status: activation.status,
            };
        }

        let matched = self.search_lookahead_window(activation, data, candidates, version);

        let (valid, used_signature_type, audit_note) = match matched {
            Some(matched) => {
                activation.counter = matched.next_counter;
                if let Some(next_ctr_data) = matched.next_ctr_data {
                    activation.ctr_data = Some(next_ctr_data);
                }
                activation.failed_attempts = 0;
                (true, Some(matched.signature_type), note::SIGNATURE_OK)
            }
            None => {
                activation.failed_attempts += 1;
                if activation.failed_attempts >= activation.max_failed_attempts {
                    activation.status = ActivationStatus::Blocked;
                    activation.blocked_reason =
                        Some(BLOCKED_REASON_MAX_FAILED_ATTEMPTS.to_owned());
                    log::warn!(
                        "activation {} blocked after {} failed attempts",
                        activation.activation_id,
                        activation.failed_attempts
                    );
                }
                (false, None, note::SIGNATURE_DOES_NOT_MATCH)
            }
        };

        self.audit.record(SignatureAuditRecord {
            activation_id: activation.activation_id.clone(),
            user_id: activation.user_id.clone(),
            application_id: activation.application_id.clone(),
            signature_type: used_signature_type.unwrap_or(attempted_type),
            signature: data.signature.clone(),
            data_base64: encoding::base64(&data.data),
            valid,
            counter_before,
            counter_after: activation.counter,
            ctr_data_before,
            signature_version: version,
            note: audit_note.to_owned(),
            additional_info: data.additional_info.clone(),
            timestamp: now,
        });

        SignatureVerification {
            valid,
            used_signature_type,
            signature_version: version,
            remaining_attempts: activation.remaining_attempts(),
            activation_status: activation.status,
        }
    }

    /// Load, verify and persist in one step.
    ///
    /// An unknown activation is an error without an audit record; there is no
    /// activation context to attach one to.
    pub fn verify_by_id<S: ActivationStore>(
        &self,
        store: &S,
        activation_id: &str,
        data: &SignatureData,
        candidates: &[SignatureType],
    ) -> Result<SignatureVerification, EngineError> {
        let mut activation = store
            .load(activation_id)
            .ok_or_else(|| EngineError::ActivationNotFound(activation_id.to_owned()))?;
        let verification = self.verify(&mut activation, data, candidates);
        store.save(&activation);
        Ok(verification)
    }

    /// Walk the lookahead window once per candidate type, in the caller's
    /// order. A type tries every counter offset before the next type is
    /// considered; the first match wins.
    fn search_lookahead_window(
        &self,
        activation: &Activation,
        data: &SignatureData,
        candidates: &[SignatureType],
        version: u32,
    ) -> Option<LookaheadMatch> {
        if let Err(err) = SignatureRequestData::parse(&data.data) {
            log::debug!(
                "signed data of activation {} failed to parse: {err}",
                activation.activation_id
            );
            return None;
        }

        let Some(device_public_key) = activation.device_public_key.as_deref() else {
            log::warn!("activation {} has no device public key", activation.activation_id);
            return None;
        };
        let server_private_key = self
            .vault
            .open(
                &activation.server_private_key,
                &[&activation.user_id, &activation.activation_id],
            )
            .map_err(|err| {
                log::warn!(
                    "server key of activation {} failed to open: {err}",
                    activation.activation_id
                );
            })
            .ok()?;

        let private = keys::private_key_from_bytes(&server_private_key).ok()?;
        let public = keys::public_key_from_bytes(device_public_key).ok()?;
        let master = keys::master_secret(&private, &public);

        let stored_chain: Option<[u8; counter::CTR_DATA_LEN]> = if version >= 3 {
            let stored = activation.ctr_data.as_deref()?;
            Some(stored.try_into().ok()?)
        } else {
            None
        };

        for ty in candidates {
            let factor_keys = keys::signature_keys(&master, *ty);
            // Hash-chain state for version 3; the chain is walked forward one
            // step per offset because the next value cannot be computed from
            // an offset directly.
            let mut chain_block = stored_chain;
            for offset in 0..=self.config.lookahead {
                let block = match chain_block {
                    Some(block) => block,
                    None => counter::from_numeric(activation.counter + offset),
                };

                if signature::verify(&data.data, &data.signature, &factor_keys, &block, data.format)
                {
                    let next_ctr_data = chain_block
                        .map(|block| counter::next(&block).map(|next| next.to_vec()))
                        .transpose()
                        .ok()?;
                    return Some(LookaheadMatch {
                        signature_type: *ty,
                        next_counter: activation.counter + offset + 1,
                        next_ctr_data,
                    });
                }

                if let Some(block) = chain_block {
                    chain_block = Some(counter::next(&block).ok()?);
                }
            }
        }
        None
    }
}

struct LookaheadMatch {
    signature_type: SignatureType,
    next_counter: u64,
    next_ctr_data: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests;
