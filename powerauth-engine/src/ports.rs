//! Ports to the engine's external collaborators.
//!
//! The engine never talks to a database or a wall clock directly. Storage,
//! audit and time come in through these traits; the host wires in its own
//! implementations. [`MemoryStore`] and [`MemoryAudit`] are reference
//! implementations used throughout the tests.
//!
//! Concurrency contract: the store must serialize mutations per activation
//! ID. Every load-mutate-save sequence for one ID runs inside an exclusive
//! critical section the store provides, e.g. a row lock; the engine itself
//! holds no locks.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use powerauth_types::{Activation, ActivationStatus, SignatureAuditRecord};

/// Durable activation storage keyed by activation ID.
pub trait ActivationStore {
    /// Load an activation under the per-ID exclusive lock.
    fn load(&self, activation_id: &str) -> Option<Activation>;

    /// Persist an activation, replacing the stored record.
    fn save(&self, activation: &Activation);

    /// All activations still waiting to complete the activation process,
    /// i.e. in `Created` or `PendingCommit`. Input to the expiry sweep.
    fn pending_activations(&self) -> Vec<Activation>;
}

/// Append-only sink for signature audit records.
pub trait AuditSink {
    /// Append one record. Records are never mutated afterwards.
    fn record(&self, record: SignatureAuditRecord);
}

/// Source of the current time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// In-memory [`ActivationStore`] for tests and examples.
#[derive(Default)]
pub struct MemoryStore {
    activations: Mutex<HashMap<String, Activation>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given activations pre-loaded.
    pub fn with_activations(activations: impl IntoIterator<Item = Activation>) -> Self {
        let store = Self::new();
        for activation in activations {
            store.save(&activation);
        }
        store
    }
}

impl ActivationStore for MemoryStore {
    fn load(&self, activation_id: &str) -> Option<Activation> {
        self.activations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(activation_id)
            .cloned()
    }

    fn save(&self, activation: &Activation) {
        self.activations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(activation.activation_id.clone(), activation.clone());
    }

    fn pending_activations(&self) -> Vec<Activation> {
        self.activations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|a| {
                matches!(
                    a.status,
                    ActivationStatus::Created | ActivationStatus::PendingCommit
                )
            })
            .cloned()
            .collect()
    }
}

/// In-memory [`AuditSink`] for tests and examples.
#[derive(Default)]
pub struct MemoryAudit {
    records: Mutex<Vec<SignatureAuditRecord>>,
}

impl MemoryAudit {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records appended so far.
    pub fn records(&self) -> Vec<SignatureAuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, record: SignatureAuditRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}
