//! # Domain Errors
//!
//! Error types for the Donation Decryption Request Ledger.
//!
//! Every rejected operation leaves the ledger exactly as it was before the
//! call.

use super::value_objects::{
    Address, AggregateKind, DecryptionTarget, DonationId, LedgerAction, NameHash, RequestId,
};
use thiserror::Error;

/// Ledger error types.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The donation's plaintext has already been revealed.
    #[error("Donation {0} already revealed")]
    AlreadyRevealed(DonationId),

    /// Request id was never issued, or its callback was already processed.
    #[error("Unknown or replayed request: {0}")]
    UnknownOrReplayedRequest(RequestId),

    /// Oracle proof did not validate against the cleartexts.
    #[error("Invalid proof for request {0}")]
    InvalidProof(RequestId),

    /// No registered name hashes to the given value.
    #[error("No {kind} name registered for hash {hash:?}")]
    NotFound {
        /// Which name list was scanned
        kind: AggregateKind,
        /// Hash that was looked up
        hash: NameHash,
    },

    /// Two distinct names share a hash. Data-integrity failure.
    #[error("Hash collision between {kind} names {existing:?} and {incoming:?}")]
    HashCollision {
        /// Name list where the collision happened
        kind: AggregateKind,
        /// Name already registered
        existing: String,
        /// Name being registered
        incoming: String,
    },

    /// Donation id was never recorded.
    #[error("Donation not found: {0}")]
    DonationNotFound(DonationId),

    /// Cleartext bytes do not match the expected ABI layout.
    #[error("Malformed cleartext: {0}")]
    MalformedCleartext(String),

    /// A request for this target is still outstanding.
    #[error("Request {request_id} already pending for {target}")]
    RequestAlreadyPending {
        /// Target of the outstanding request
        target: DecryptionTarget,
        /// Outstanding request id
        request_id: RequestId,
    },

    /// Caller is not allowed to perform the action.
    #[error("Unauthorized: {} may not {action:?}", hex::encode(.caller))]
    Unauthorized {
        /// Rejected caller
        caller: Address,
        /// Attempted action
        action: LedgerAction,
    },

    /// Invalid configuration.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Decryption oracle failure.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Homomorphic arithmetic service failure.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),
}

impl LedgerError {
    /// Whether the same call may succeed if retried later.
    ///
    /// A rejected proof leaves the request `Requested`, so the oracle can
    /// resubmit a corrected callback.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidProof(_) | Self::Oracle(_) | Self::Arithmetic(_)
        )
    }

    /// Whether the error signals corrupted ledger data.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::HashCollision { .. })
    }
}
