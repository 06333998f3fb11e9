//! AAGUID registry mapping authenticator models to signature types.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

use powerauth_types::SignatureType;

use crate::{default_authenticators, Aaguid};

pub use crate::default_authenticators::{is_wultra_model, WULTRA_AUTHENTICATOR};

/// Description and signature type sentinel for authenticator models nobody
/// registered, including the all-zero AAGUID of self attestation.
const UNKNOWN_DESCRIPTION: &str = "Unknown FIDO2 Authenticator";
const UNKNOWN_SIGNATURE_TYPE: SignatureType = SignatureType::Possession;

/// Default time after which deployment overrides are re-fetched.
const DEFAULT_OVERRIDES_TTL: Duration = Duration::from_secs(300);

/// Details of one authenticator model: the AAGUID, a human-readable
/// description, and the signature type credentials of this model map onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fido2Authenticator {
    /// AAGUID of the model, `None` for the unknown sentinel built from an
    /// unparseable identifier.
    pub aaguid: Option<Uuid>,
    /// Human-readable model name.
    pub description: String,
    /// Signature type a successful assertion with this model counts as.
    pub signature_type: SignatureType,
}

impl Fido2Authenticator {
    fn unknown(aaguid: Uuid) -> Self {
        Self {
            aaguid: Some(aaguid),
            description: UNKNOWN_DESCRIPTION.to_owned(),
            signature_type: UNKNOWN_SIGNATURE_TYPE,
        }
    }
}

/// Source of deployment-specific authenticator entries layered over the
/// compiled-in table.
///
/// The registry fetches the whole set at once and caches it; implementations
/// back this with a database table or a remote catalog.
pub trait AuthenticatorOverrides {
    /// Return every override entry.
    fn fetch_all(&self) -> Vec<Fido2Authenticator>;
}

/// The empty override source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl AuthenticatorOverrides for NoOverrides {
    fn fetch_all(&self) -> Vec<Fido2Authenticator> {
        Vec::new()
    }
}

struct Cache {
    entries: HashMap<Uuid, Fido2Authenticator>,
    refreshed_at: Option<Instant>,
}

/// Registry resolving AAGUIDs to authenticator details.
///
/// Resolution order: deployment overrides, then the compiled-in table, then
/// the unknown sentinel. A lookup therefore always yields an answer; an
/// unrecognized model degrades to possession-only rather than failing the
/// ceremony.
pub struct AuthenticatorRegistry<O = NoOverrides> {
    overrides: O,
    ttl: Duration,
    cache: Mutex<Cache>,
}

impl Default for AuthenticatorRegistry {
    fn default() -> Self {
        Self::new(NoOverrides)
    }
}

impl<O: AuthenticatorOverrides> AuthenticatorRegistry<O> {
    /// Create a registry over the given override source.
    pub fn new(overrides: O) -> Self {
        Self::with_ttl(overrides, DEFAULT_OVERRIDES_TTL)
    }

    /// Create a registry that re-fetches overrides after `ttl`.
    pub fn with_ttl(overrides: O, ttl: Duration) -> Self {
        Self {
            overrides,
            ttl,
            cache: Mutex::new(Cache {
                entries: HashMap::new(),
                refreshed_at: None,
            }),
        }
    }

    /// Resolve an AAGUID to authenticator details. Never fails.
    pub fn lookup(&self, aaguid: &Aaguid) -> Fido2Authenticator {
        let uuid = aaguid.to_uuid();
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        let stale = cache
            .refreshed_at
            .map_or(true, |at| at.elapsed() >= self.ttl);
        if stale {
            let entries = self.overrides.fetch_all();
            log::debug!("refreshed authenticator overrides, {} entries", entries.len());
            cache.entries = entries
                .into_iter()
                .filter_map(|model| model.aaguid.map(|id| (id, model)))
                .collect();
            cache.refreshed_at = Some(Instant::now());
        }

        cache
            .entries
            .get(&uuid)
            .cloned()
            .or_else(|| default_authenticators::find_by_aaguid(uuid))
            .unwrap_or_else(|| Fido2Authenticator::unknown(uuid))
    }
}
