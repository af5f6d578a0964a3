//! Unified error system for the spawner protocol
//!
//! One error type covers every failure a spawn operation can surface. The
//! variants separate local precondition failures from ledger lookups, stale
//! submissions and whole-transaction rejections so that callers can decide
//! between "fix the input", "refresh and rebuild" and "re-check existence".
//!
//! "Resource already exists" is not represented here: it is a success path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the ledger refused a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// A signer counter did not match the ledger's next expected value
    StaleCounter,
    /// The debited account did not hold enough coins
    InsufficientFunds,
    /// Signatures or governance rules did not authorize an instruction
    Unauthorized,
    /// A spawn targeted an identifier that is already in use
    DuplicateInstance,
    /// An instruction argument was missing or could not be decoded
    InvalidArgument,
    /// Any other refusal reported by the ledger
    Other,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StaleCounter => "stale counter",
            Self::InsufficientFunds => "insufficient funds",
            Self::Unauthorized => "unauthorized",
            Self::DuplicateInstance => "duplicate instance",
            Self::InvalidArgument => "invalid argument",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Unified error type for all spawner operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SpawnError {
    /// Local precondition failure, detected before any ledger interaction
    #[error("Validation failed: {message}")]
    Validation {
        /// What precondition was violated
        message: String,
    },

    /// The ledger could not be reached for a proof lookup
    #[error("Ledger not reachable: {message}")]
    NotReachable {
        /// Transport-level description of the failure
        message: String,
    },

    /// A proof or ledger value could not be interpreted
    #[error("Malformed ledger data: {message}")]
    Malformed {
        /// What was wrong with the data
        message: String,
    },

    /// Counters or prices were outdated by the time of submission
    #[error("Stale state: {message}")]
    StaleState {
        /// Ledger-provided detail
        message: String,
    },

    /// The ledger refused the whole transaction; nothing was applied
    #[error("Transaction rejected ({reason}): {message}")]
    Rejected {
        /// Classified refusal reason
        reason: RejectionReason,
        /// Ledger-provided detail
        message: String,
    },

    /// Ledger state carried a contract id with no known decoder
    #[error("Unknown contract: {contract_id}")]
    UnknownContract {
        /// The unrecognised contract id
        contract_id: String,
    },

    /// Encoding or decoding of a contract structure failed
    #[error("Serialization error: {message}")]
    Serialization {
        /// Codec error description
        message: String,
    },

    /// A signing operation failed
    #[error("Crypto error: {message}")]
    Crypto {
        /// Error message describing the cryptographic failure
        message: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },
}

impl SpawnError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-reachable lookup error
    pub fn not_reachable(message: impl Into<String>) -> Self {
        Self::NotReachable {
            message: message.into(),
        }
    }

    /// Create a malformed-data lookup error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Create a stale-state error
    pub fn stale_state(message: impl Into<String>) -> Self {
        Self::StaleState {
            message: message.into(),
        }
    }

    /// Create a rejection error
    pub fn rejected(reason: RejectionReason, message: impl Into<String>) -> Self {
        Self::Rejected {
            reason,
            message: message.into(),
        }
    }

    /// Create an unknown-contract error
    pub fn unknown_contract(contract_id: impl Into<String>) -> Self {
        Self::UnknownContract {
            contract_id: contract_id.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a crypto error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for failures of the proof lookup itself (not absence).
    pub fn is_proof_lookup(&self) -> bool {
        matches!(self, Self::NotReachable { .. } | Self::Malformed { .. })
    }

    /// True when the ledger may have refused because a concurrent creation won.
    ///
    /// Callers should re-check existence before treating these as fatal.
    pub fn should_recheck(&self) -> bool {
        matches!(
            self,
            Self::StaleState { .. }
                | Self::Rejected {
                    reason: RejectionReason::DuplicateInstance,
                    ..
                }
        )
    }
}

/// Standard Result type for spawner operations
pub type SpawnResult<T> = std::result::Result<T, SpawnError>;

impl From<bincode::Error> for SpawnError {
    fn from(err: bincode::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SpawnError::validation("need exactly 31 bytes");
        assert!(matches!(err, SpawnError::Validation { .. }));
        assert_eq!(err.to_string(), "Validation failed: need exactly 31 bytes");
    }

    #[test]
    fn test_rejection_display() {
        let err = SpawnError::rejected(RejectionReason::InsufficientFunds, "balance 3 < 5");
        assert_eq!(
            err.to_string(),
            "Transaction rejected (insufficient funds): balance 3 < 5"
        );
    }

    #[test]
    fn test_classification() {
        assert!(SpawnError::not_reachable("timeout").is_proof_lookup());
        assert!(SpawnError::malformed("short proof").is_proof_lookup());
        assert!(!SpawnError::validation("x").is_proof_lookup());

        assert!(SpawnError::stale_state("counter 3").should_recheck());
        assert!(
            SpawnError::rejected(RejectionReason::DuplicateInstance, "taken").should_recheck()
        );
        assert!(
            !SpawnError::rejected(RejectionReason::InsufficientFunds, "poor").should_recheck()
        );
    }
}
