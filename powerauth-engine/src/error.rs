use thiserror::Error;

use powerauth_crypto::CryptoError;
use powerauth_types::{ActivationProtocol, ActivationStatus, RecoveryCodeStatus};

/// Errors surfaced by the engine to its service layer.
///
/// An invalid signature or a rejected PUK is not an error; those are normal
/// outcomes carried in the respective result types. Errors mean the operation
/// could not be attempted at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No activation exists under the given identifier.
    #[error("activation {0} was not found")]
    ActivationNotFound(String),
    /// The activation is in a state that does not allow the operation.
    #[error("activation {activation_id} is in state {status}")]
    ActivationIncorrectState {
        /// Identifier of the activation.
        activation_id: String,
        /// State the activation was found in.
        status: ActivationStatus,
    },
    /// The activation process deadline passed before the operation.
    #[error("activation {0} expired before completing the activation process")]
    ActivationExpired(String),
    /// The device public key is set exactly once and was already present.
    #[error("device public key is already set for activation {0}")]
    DevicePublicKeyAlreadySet(String),
    /// The operation applies to a different protocol family.
    #[error("activation {activation_id} uses protocol {protocol}")]
    ProtocolMismatch {
        /// Identifier of the activation.
        activation_id: String,
        /// Protocol family the activation actually uses.
        protocol: ActivationProtocol,
    },
    /// The recovery code is in a state that does not allow PUK consumption.
    #[error("recovery code is in state {status}")]
    RecoveryCodeIncorrectState {
        /// State the recovery code was found in.
        status: RecoveryCodeStatus,
    },
    /// A cryptographic operation failed outside the verification path.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
