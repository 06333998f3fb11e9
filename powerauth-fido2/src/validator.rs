//! Registration and assertion ceremony validation.
//!
//! Validators run after the payloads already parsed; they check the ceremony
//! bindings (type, challenge, origins, RP ID scope, user presence and
//! verification) and return `None` on success or a human-readable rejection
//! reason. Key-material checks (ES256, P-256, EC2) are enforced earlier, at
//! parse time.

use crate::{AttestationFormat, AttestationObject, AuthenticatorData, CollectedClientData, Flags,
    PublicKeyObject};

/// A parsed registration ceremony to validate.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Decoded collected client data.
    pub client_data: CollectedClientData,
    /// Decoded attestation object.
    pub attestation_object: AttestationObject,
    /// Challenge the server issued for this ceremony, if it tracks one.
    pub expected_challenge: Option<String>,
    /// Origins the ceremony may be performed on.
    pub allowed_origins: Vec<String>,
    /// Top-level origins allowed for cross-origin ceremonies.
    pub allowed_top_origins: Vec<String>,
    /// Relying party ID the credential must be scoped to.
    pub relying_party_id: String,
    /// Whether the authenticator must have verified the user.
    pub requires_user_verification: bool,
}

/// A parsed assertion ceremony to validate.
#[derive(Debug, Clone)]
pub struct AssertionRequest {
    /// Decoded collected client data.
    pub client_data: CollectedClientData,
    /// Decoded authenticator data.
    pub authenticator_data: AuthenticatorData,
    /// Challenge the server issued for this ceremony, if it tracks one.
    pub expected_challenge: Option<String>,
    /// Origins the ceremony may be performed on.
    pub allowed_origins: Vec<String>,
    /// Top-level origins allowed for cross-origin ceremonies.
    pub allowed_top_origins: Vec<String>,
    /// Relying party ID the credential must be scoped to.
    pub relying_party_id: String,
    /// Whether the authenticator must have verified the user.
    pub requires_user_verification: bool,
}

/// Validate a registration ceremony. Returns a rejection reason, or `None`
/// when the ceremony is acceptable.
pub fn validate_registration(request: &RegistrationRequest) -> Option<String> {
    let client_data = &request.client_data;

    if client_data.ty != CollectedClientData::TYPE_CREATE {
        return Some("Request does not contain webauthn.create type.".into());
    }

    if let Some(reason) = validate_ceremony_bindings(
        client_data,
        request.expected_challenge.as_deref(),
        &request.allowed_origins,
        &request.allowed_top_origins,
    ) {
        return Some(reason);
    }

    let auth_data = &request.attestation_object.auth_data;
    if auth_data.rp_id_hash() != &crate::sha256(request.relying_party_id.as_bytes()) {
        return Some(
            "The relying party ID stored with authenticator does not match \
             the relying party ID provided in the request."
                .into(),
        );
    }

    if let Some(reason) =
        validate_user_flags(auth_data.flags, request.requires_user_verification)
    {
        return Some(reason);
    }

    let fmt = &request.attestation_object.fmt;
    if !fmt.is_allowed() {
        return Some("Invalid attestation format identifier.".into());
    }

    let Some(attested) = &auth_data.attested_credential_data else {
        return Some("Missing attestation data.".into());
    };
    if attested.credential_id().is_empty() {
        return Some("Missing credential identifier.".into());
    }

    if *fmt == AttestationFormat::Packed
        && request.attestation_object.att_stmt.algorithm != Some(PublicKeyObject::ALGORITHM)
    {
        return Some(
            "Attestation algorithm does not match algorithm used for the public key.".into(),
        );
    }

    None
}

/// Validate an assertion ceremony. Returns a rejection reason, or `None`
/// when the ceremony is acceptable.
pub fn validate_assertion(request: &AssertionRequest) -> Option<String> {
    let client_data = &request.client_data;

    if client_data.ty != CollectedClientData::TYPE_GET {
        return Some("Request does not contain webauthn.get type.".into());
    }

    if let Some(reason) = validate_ceremony_bindings(
        client_data,
        request.expected_challenge.as_deref(),
        &request.allowed_origins,
        &request.allowed_top_origins,
    ) {
        return Some(reason);
    }

    let auth_data = &request.authenticator_data;
    if auth_data.rp_id_hash() != &crate::sha256(request.relying_party_id.as_bytes()) {
        return Some("The origin does not match relying party ID.".into());
    }

    validate_user_flags(auth_data.flags, request.requires_user_verification)
}

/// Challenge and origin checks shared by both ceremonies.
fn validate_ceremony_bindings(
    client_data: &CollectedClientData,
    expected_challenge: Option<&str>,
    allowed_origins: &[String],
    allowed_top_origins: &[String],
) -> Option<String> {
    if let Some(expected) = expected_challenge {
        if expected != client_data.challenge {
            return Some("Request does not contain the correct challenge.".into());
        }
    }

    if !allowed_origins.iter().any(|origin| *origin == client_data.origin) {
        return Some("Request does not contain the correct origin.".into());
    }

    if let Some(top_origin) = &client_data.top_origin {
        if !allowed_top_origins.iter().any(|origin| origin == top_origin) {
            return Some("Request contains the top origin which is not allowed.".into());
        }
    }

    None
}

fn validate_user_flags(flags: Flags, requires_user_verification: bool) -> Option<String> {
    if !flags.user_present() {
        return Some("User is not present during the authentication.".into());
    }
    if requires_user_verification && !flags.user_verified() {
        return Some(
            "User is not present during the authentication, but user verification is required."
                .into(),
        );
    }
    None
}
