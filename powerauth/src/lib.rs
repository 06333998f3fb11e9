//! # PowerAuth server core
//!
//! A collection of Rust libraries implementing the server side of the
//! PowerAuth multi-factor authentication protocol, together with WebAuthn/
//! FIDO2 credential verification mapped onto the same activation model. It is
//! comprised of four sub-libraries:
//!
//! - `powerauth-engine` — usable as [`engine`], the stateful core: the
//!   activation lifecycle state machine, the replay-protected
//!   [`SignatureVerifier`](engine::SignatureVerifier), recovery PUK
//!   consumption, and the FIDO2 assertion bridge.
//! - `powerauth-crypto` — usable as [`crypto`], pure primitives: ECDH key
//!   agreement and factor-key derivation, the hash-based counter,
//!   multi-factor signature computation, and the encrypted-blob vault.
//! - `powerauth-fido2` — usable as [`fido2`], WebAuthn payload parsing,
//!   ceremony validation and the AAGUID registry.
//! - `powerauth-types` — type definitions, usable as [`types`], shared by
//!   the other crates.
//!
//! The engine talks to its surroundings exclusively through the port traits
//! in [`engine::ports`]: an [`ActivationStore`](engine::ActivationStore)
//! providing per-activation exclusive load/save, an
//! [`AuditSink`](engine::AuditSink) receiving one record per verification
//! attempt, and a [`Clock`](engine::Clock). Transport layers, persistence
//! technology and callback dispatch are left to the host service.
//!
//! ## Example: validating a FIDO2 assertion ceremony
//!
//! ```
//! use powerauth::fido2::{
//!     validate_assertion, AssertionRequest, AuthenticatorData, CollectedClientData, Flags,
//! };
//!
//! let authenticator_data = AuthenticatorData::new("example.com", 42).with_flags(Flags::UV);
//! let request = AssertionRequest {
//!     client_data: CollectedClientData {
//!         ty: CollectedClientData::TYPE_GET.into(),
//!         challenge: "c2VydmVyLWNoYWxsZW5nZQ".into(),
//!         origin: "https://example.com".into(),
//!         top_origin: None,
//!         cross_origin: Some(false),
//!     },
//!     authenticator_data,
//!     expected_challenge: Some("c2VydmVyLWNoYWxsZW5nZQ".into()),
//!     allowed_origins: vec!["https://example.com".into()],
//!     allowed_top_origins: Vec::new(),
//!     relying_party_id: "example.com".into(),
//!     requires_user_verification: true,
//! };
//!
//! assert!(validate_assertion(&request).is_none());
//! ```
//!
//! ## Example: verifying a PowerAuth signature
//!
//! ```
//! use powerauth::{
//!     crypto::{counter, keys, signature, Vault},
//!     engine::{MemoryAudit, MemoryStore, SignatureVerifier},
//!     types::{
//!         activation::test_support::active_activation, encoding::base64, EncryptedValue,
//!         EncryptionMode, SignatureData, SignatureFormat, SignatureType,
//!     },
//! };
//!
//! // Server and device key pairs, as established during activation.
//! let server_private = p256::SecretKey::random(&mut rand::rngs::OsRng);
//! let device_private = p256::SecretKey::random(&mut rand::rngs::OsRng);
//!
//! let mut activation = active_activation();
//! activation.server_private_key = EncryptedValue {
//!     mode: EncryptionMode::NoEncryption,
//!     data: server_private.to_bytes().to_vec(),
//! };
//! activation.device_public_key =
//!     Some(device_private.public_key().to_sec1_bytes().to_vec());
//! activation.ctr_data = Some(counter::init().to_vec());
//!
//! // The client signs the canonical request concatenation with its factor
//! // keys and the current counter block.
//! let master = keys::master_secret(&device_private, &server_private.public_key());
//! let signed_data = format!(
//!     "POST&{}&{}&{}&{}",
//!     base64(b"/pa/signature/validate"),
//!     base64(&[7; 16]),
//!     base64(b"{}"),
//!     base64(b"app-secret"),
//! )
//! .into_bytes();
//! let claimed = signature::compute(
//!     &signed_data,
//!     &keys::signature_keys(&master, SignatureType::PossessionKnowledge),
//!     activation.ctr_data.as_deref().unwrap(),
//!     SignatureFormat::Base64,
//! );
//!
//! let verifier = SignatureVerifier::new(Vault::unencrypted(), MemoryAudit::new());
//! let store = MemoryStore::with_activations([activation.clone()]);
//! let result = verifier
//!     .verify_by_id(
//!         &store,
//!         &activation.activation_id,
//!         &SignatureData::new(signed_data, claimed, SignatureFormat::Base64),
//!         &[SignatureType::PossessionKnowledge],
//!     )
//!     .unwrap();
//!
//! assert!(result.valid);
//! assert_eq!(result.used_signature_type, Some(SignatureType::PossessionKnowledge));
//! ```

pub use powerauth_crypto as crypto;
pub use powerauth_engine as engine;
pub use powerauth_fido2 as fido2;
pub use powerauth_types as types;
