//! # PowerAuth Engine
//!
//! The stateful core of the PowerAuth server: the activation lifecycle state
//! machine, the replay-protected multi-factor [`SignatureVerifier`], recovery
//! PUK consumption, and the bridge mapping FIDO2 assertions onto the same
//! activation model.
//!
//! The engine is synchronous and holds no locks of its own. Storage, audit
//! and time come in through the [`ports`] traits; the storage collaborator
//! guarantees at most one in-flight mutation per activation ID, and every
//! operation here is safe to run inside such a critical section: no I/O
//! beyond the ports, no unbounded retries, bounded lookahead search.

mod error;
pub mod fido2;
pub mod lifecycle;
pub mod ports;
pub mod recovery;
pub mod verifier;

pub use self::{
    error::EngineError,
    fido2::AssertionOutcome,
    ports::{ActivationStore, AuditSink, Clock, MemoryAudit, MemoryStore, SystemClock},
    recovery::PukConsumption,
    verifier::{SignatureVerification, SignatureVerifier, VerifierConfig},
};
