use chrono::{DateTime, TimeZone, Utc};
use p256::SecretKey;
use rand::rngs::OsRng;

use powerauth_crypto::{counter, kdf::DerivedKey, keys, signature, Vault};
use powerauth_types::{
    activation::test_support::active_activation, encoding::base64, ActivationStatus,
    EncryptedValue, EncryptionMode, SignatureData, SignatureFormat, SignatureType,
};

use crate::ports::{MemoryAudit, MemoryStore};

use super::*;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 10, 1, 0).unwrap()
}

fn verifier() -> SignatureVerifier<MemoryAudit, FixedClock> {
    SignatureVerifier::with_clock(
        Vault::unencrypted(),
        MemoryAudit::new(),
        FixedClock(test_time()),
        VerifierConfig::default(),
    )
}

const CTR_SEED: [u8; 16] = [0x42; 16];

/// An active activation with real key material: the server private key in
/// plaintext, a device public key, and the master secret the client side
/// would hold.
fn provisioned_activation() -> (Activation, DerivedKey) {
    let _ = env_logger::builder().is_test(true).try_init();

    let server_private = SecretKey::random(&mut OsRng);
    let device_private = SecretKey::random(&mut OsRng);
    let device_public = device_private.public_key();

    let master = keys::master_secret(&server_private, &device_public);

    let mut activation = active_activation();
    activation.server_private_key = EncryptedValue {
        mode: EncryptionMode::NoEncryption,
        data: server_private.to_bytes().to_vec(),
    };
    activation.server_public_key = server_private.public_key().to_sec1_bytes().to_vec();
    activation.device_public_key = Some(device_public.to_sec1_bytes().to_vec());
    activation.counter = 10;
    activation.ctr_data = Some(CTR_SEED.to_vec());
    (activation, master)
}

fn signed_data() -> Vec<u8> {
    format!(
        "POST&{}&{}&{}&{}",
        base64(b"/pa/signature/validate"),
        base64(&[7; 16]),
        base64(b"{\"amount\":100}"),
        base64(b"app-secret"),
    )
    .into_bytes()
}

/// Compute the signature a client at counter offset `k` past the stored
/// value would produce.
fn client_signature(master: &DerivedKey, ty: SignatureType, k: u64) -> SignatureData {
    let mut block = CTR_SEED;
    for _ in 0..k {
        block = counter::next(&block).unwrap();
    }
    let data = signed_data();
    let sig = signature::compute(
        &data,
        &keys::signature_keys(master, ty),
        &block,
        SignatureFormat::Base64,
    );
    SignatureData::new(data, sig, SignatureFormat::Base64)
}

fn chain_at(k: u64) -> Vec<u8> {
    let mut block = CTR_SEED;
    for _ in 0..k {
        block = counter::next(&block).unwrap();
    }
    block.to_vec()
}

#[test]
fn valid_signature_advances_counter_and_resets_failures() {
    let (mut activation, master) = provisioned_activation();
    activation.failed_attempts = 2;
    let verifier = verifier();

    let data = client_signature(&master, SignatureType::Possession, 0);
    let result = verifier.verify(&mut activation, &data, &[SignatureType::Possession]);

    assert!(result.valid);
    assert_eq!(result.used_signature_type, Some(SignatureType::Possession));
    assert_eq!(activation.counter, 11);
    assert_eq!(activation.ctr_data, Some(chain_at(1)));
    assert_eq!(activation.failed_attempts, 0);
    assert_eq!(activation.timestamp_last_used, test_time());

    let records = verifier.audit_sink().records();
    assert_eq!(records.len(), 1);
    assert!(records[0].valid);
    assert_eq!(records[0].note, "signature_ok");
    assert_eq!(records[0].counter_before, 10);
    assert_eq!(records[0].counter_after, 11);
    assert_eq!(records[0].ctr_data_before, Some(base64(&CTR_SEED)));
}

#[test]
fn lookahead_accepts_signatures_within_the_bound() {
    let (mut activation, master) = provisioned_activation();
    let verifier = verifier();

    let data = client_signature(&master, SignatureType::Possession, 3);
    let result = verifier.verify(&mut activation, &data, &[SignatureType::Possession]);

    assert!(result.valid);
    // Matched at offset 3; the persisted state is one step past the match.
    assert_eq!(activation.counter, 14);
    assert_eq!(activation.ctr_data, Some(chain_at(4)));
}

#[test]
fn signature_beyond_the_lookahead_bound_is_invalid() {
    let (mut activation, master) = provisioned_activation();
    let verifier = verifier();

    let data = client_signature(&master, SignatureType::Possession, 6);
    let result = verifier.verify(&mut activation, &data, &[SignatureType::Possession]);

    assert!(!result.valid);
    assert_eq!(activation.counter, 10);
    assert_eq!(activation.ctr_data, Some(CTR_SEED.to_vec()));
    assert_eq!(activation.failed_attempts, 1);
    assert_eq!(verifier.audit_sink().records()[0].note, "signature_does_not_match");
}

#[test]
fn failure_threshold_blocks_at_exactly_max_failed_attempts() {
    let (mut activation, _) = provisioned_activation();
    activation.max_failed_attempts = 3;
    let verifier = verifier();

    let bogus = SignatureData::new(signed_data(), "AAAA".into(), SignatureFormat::Base64);
    for expected_failures in 1..=2 {
        let result = verifier.verify(&mut activation, &bogus, &[SignatureType::Possession]);
        assert!(!result.valid);
        assert_eq!(activation.failed_attempts, expected_failures);
        assert_eq!(activation.status, ActivationStatus::Active);
    }

    let result = verifier.verify(&mut activation, &bogus, &[SignatureType::Possession]);
    assert!(!result.valid);
    assert_eq!(activation.status, ActivationStatus::Blocked);
    assert_eq!(result.activation_status, ActivationStatus::Blocked);
    assert_eq!(result.remaining_attempts, 0);
    assert_eq!(
        activation.blocked_reason.as_deref(),
        Some(BLOCKED_REASON_MAX_FAILED_ATTEMPTS)
    );
    assert_eq!(verifier.audit_sink().records().len(), 3);
}

#[test]
fn non_active_activation_is_audited_without_key_derivation() {
    let (mut activation, master) = provisioned_activation();
    activation.status = ActivationStatus::Blocked;
    let verifier = verifier();

    let data = client_signature(&master, SignatureType::Possession, 0);
    let result = verifier.verify(&mut activation, &data, &[SignatureType::Possession]);

    assert!(!result.valid);
    // State rejection is not a failed attempt.
    assert_eq!(activation.failed_attempts, 0);
    assert_eq!(activation.counter, 10);

    let records = verifier.audit_sink().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].note, "activation_invalid_state");
}

#[test]
fn unparseable_signed_data_is_an_audited_failed_attempt() {
    let (mut activation, _) = provisioned_activation();
    let verifier = verifier();

    // Missing separators: not the canonical 5-segment form.
    let data = SignatureData::new(b"POSTgarbage".to_vec(), "AAAA".into(), SignatureFormat::Base64);
    let result = verifier.verify(&mut activation, &data, &[SignatureType::Possession]);

    assert!(!result.valid);
    assert_eq!(activation.failed_attempts, 1);
    assert_eq!(verifier.audit_sink().records().len(), 1);
}

#[test]
fn version_2_uses_the_numeric_counter_block() {
    let (mut activation, master) = provisioned_activation();
    activation.version = 2;
    activation.ctr_data = None;
    activation.counter = 7;
    let verifier = verifier();

    let data = signed_data();
    let sig = signature::compute(
        &data,
        &keys::signature_keys(&master, SignatureType::Possession),
        &counter::from_numeric(9),
        SignatureFormat::Decimal,
    );
    let request = SignatureData::new(data, sig, SignatureFormat::Decimal);
    let result = verifier.verify(&mut activation, &request, &[SignatureType::Possession]);

    assert!(result.valid);
    assert_eq!(result.signature_version, 2);
    assert_eq!(activation.counter, 10);
    assert_eq!(activation.ctr_data, None);
}

#[test]
fn forced_signature_version_selects_the_counter_representation() {
    let (mut activation, master) = provisioned_activation();
    // A version 3 activation verifying with the legacy representation
    // during a migration window.
    let verifier = verifier();

    let data = signed_data();
    let sig = signature::compute(
        &data,
        &keys::signature_keys(&master, SignatureType::Possession),
        &counter::from_numeric(10),
        SignatureFormat::Base64,
    );
    let mut request = SignatureData::new(data, sig, SignatureFormat::Base64);
    request.forced_signature_version = Some(2);

    let result = verifier.verify(&mut activation, &request, &[SignatureType::Possession]);
    assert!(result.valid);
    assert_eq!(result.signature_version, 2);

    // Without the forced version the same signature must not verify: the
    // wrong representation fails rather than being coerced.
    let (mut fresh, _) = provisioned_activation();
    fresh.server_private_key = activation.server_private_key.clone();
    fresh.device_public_key = activation.device_public_key.clone();
    request.forced_signature_version = None;
    assert!(!verifier.verify(&mut fresh, &request, &[SignatureType::Possession]).valid);
}

#[test]
fn offline_candidates_record_the_first_matching_type() {
    let (mut activation, master) = provisioned_activation();
    let verifier = verifier();
    let candidates = [SignatureType::Possession, SignatureType::PossessionKnowledge];

    let data = client_signature(&master, SignatureType::PossessionKnowledge, 0);
    let result = verifier.verify(&mut activation, &data, &candidates);

    assert!(result.valid);
    assert_eq!(result.used_signature_type, Some(SignatureType::PossessionKnowledge));
    assert_eq!(
        verifier.audit_sink().records()[0].signature_type,
        SignatureType::PossessionKnowledge
    );
}

#[test]
fn each_candidate_walks_the_full_window_in_caller_order() {
    let (mut activation, master) = provisioned_activation();
    let verifier = verifier();
    // The first candidate exhausts its whole window without matching before
    // the second is considered, which then matches at a deep offset.
    let candidates = [SignatureType::PossessionKnowledge, SignatureType::Possession];

    let data = client_signature(&master, SignatureType::Possession, 4);
    let result = verifier.verify(&mut activation, &data, &candidates);

    assert!(result.valid);
    assert_eq!(result.used_signature_type, Some(SignatureType::Possession));
    assert_eq!(activation.counter, 15);
    assert_eq!(activation.ctr_data, Some(chain_at(5)));
}

#[test]
fn sealed_server_key_with_wrong_context_is_invalid_but_audited() {
    let master_key = vec![0x24; 32];
    let sealing_vault = Vault::new(Some(master_key.clone()));

    let (mut activation, master) = provisioned_activation();
    let plain_key = activation.server_private_key.data.clone();
    // Sealed under a context that does not match this activation's identity.
    activation.server_private_key = sealing_vault
        .seal(&plain_key, &["someone-else", &activation.activation_id])
        .unwrap();

    let verifier = SignatureVerifier::with_clock(
        Vault::new(Some(master_key)),
        MemoryAudit::new(),
        FixedClock(test_time()),
        VerifierConfig::default(),
    );

    let data = client_signature(&master, SignatureType::Possession, 0);
    let result = verifier.verify(&mut activation, &data, &[SignatureType::Possession]);

    assert!(!result.valid);
    assert_eq!(activation.failed_attempts, 1);
    assert_eq!(verifier.audit_sink().records().len(), 1);
}

#[test]
fn verify_by_id_persists_the_updated_activation() {
    let (activation, master) = provisioned_activation();
    let activation_id = activation.activation_id.clone();
    let store = MemoryStore::with_activations([activation]);
    let verifier = verifier();

    let data = client_signature(&master, SignatureType::Possession, 0);
    let result = verifier
        .verify_by_id(&store, &activation_id, &data, &[SignatureType::Possession])
        .unwrap();

    assert!(result.valid);
    assert_eq!(store.load(&activation_id).unwrap().counter, 11);
}

#[test]
fn unknown_activation_is_an_error_without_an_audit_record() {
    let store = MemoryStore::new();
    let verifier = verifier();
    let data = SignatureData::new(signed_data(), "AAAA".into(), SignatureFormat::Base64);

    let err = verifier
        .verify_by_id(&store, "no-such-activation", &data, &[SignatureType::Possession])
        .unwrap_err();
    assert_eq!(err, EngineError::ActivationNotFound("no-such-activation".into()));
    assert!(verifier.audit_sink().records().is_empty());
}
