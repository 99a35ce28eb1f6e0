//! # Domain Value Objects
//!
//! Immutable value types for the Donation Decryption Request Ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller address (20-byte).
pub type Address = [u8; 20];

/// Sequential donation identifier. The first recorded donation is `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DonationId(pub u64);

impl fmt::Display for DonationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque request identifier issued by the decryption oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl RequestId {
    /// Big-endian bytes, as bound into oracle proofs.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to an encrypted value.
///
/// Only the homomorphic arithmetic service and the oracle interpret the
/// contents; the ledger stores and forwards handles unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiphertextHandle(pub [u8; 32]);

impl CiphertextHandle {
    /// Raw handle bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Keccak-256 digest of an aggregate name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameHash(pub [u8; 32]);

impl fmt::Debug for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameHash({}..)", hex::encode(&self.0[..4]))
    }
}

/// Which running total an aggregate belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateKind {
    /// Total received by a lobbying entity.
    Entity,
    /// Total given by a donor.
    Donor,
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity => write!(f, "entity"),
            Self::Donor => write!(f, "donor"),
        }
    }
}

/// Key of an encrypted aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateKey {
    /// Entity or donor total.
    pub kind: AggregateKind,
    /// Plaintext name, as revealed by a donation decryption.
    pub name: String,
}

impl AggregateKey {
    /// Key for an entity total.
    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            kind: AggregateKind::Entity,
            name: name.into(),
        }
    }

    /// Key for a donor total.
    pub fn donor(name: impl Into<String>) -> Self {
        Self {
            kind: AggregateKind::Donor,
            name: name.into(),
        }
    }
}

impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// What an outstanding decryption request will reveal.
///
/// Requests are routed by this tagged target directly, so no name has to be
/// recovered from a hash on the callback path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecryptionTarget {
    /// A single donation's (amount, entity, donor) triple.
    Donation(DonationId),
    /// A running encrypted total.
    Aggregate(AggregateKey),
}

impl fmt::Display for DecryptionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Donation(id) => write!(f, "donation#{}", id),
            Self::Aggregate(key) => write!(f, "aggregate[{}]", key),
        }
    }
}

/// Privileged ledger operations checked by the access policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerAction {
    /// Submit a new encrypted donation.
    RecordDonation,
    /// Append to the connection log.
    RecordConnection,
    /// Ask the oracle to decrypt a donation.
    RequestDecryption,
    /// Ask the oracle to decrypt an aggregate total.
    RequestAggregateDecryption,
    /// Deliver an oracle callback.
    FulfillDecryption,
}

/// Decryption request state machine, per target.
///
/// ```text
/// NoRequest ──request──→ Requested ──fulfill──→ Fulfilled
/// ```
///
/// There is no cancel or timeout edge: a `Requested` target whose callback
/// never arrives stays `Requested`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestState {
    /// No decryption has been requested.
    #[default]
    NoRequest,
    /// Oracle request outstanding.
    Requested,
    /// Callback processed.
    Fulfilled,
}

impl RequestState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: RequestState) -> bool {
        matches!(
            (self, next),
            (Self::NoRequest, Self::Requested) | (Self::Requested, Self::Fulfilled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_state_transitions() {
        assert!(RequestState::NoRequest.can_transition_to(RequestState::Requested));
        assert!(RequestState::Requested.can_transition_to(RequestState::Fulfilled));
        assert!(!RequestState::NoRequest.can_transition_to(RequestState::Fulfilled));
        assert!(!RequestState::Fulfilled.can_transition_to(RequestState::Requested));
        assert!(!RequestState::Requested.can_transition_to(RequestState::NoRequest));
    }

    #[test]
    fn test_aggregate_key_display() {
        assert_eq!(AggregateKey::entity("EntityA").to_string(), "entity:EntityA");
        assert_eq!(AggregateKey::donor("DonorX").to_string(), "donor:DonorX");
    }

    #[test]
    fn test_target_display() {
        let target = DecryptionTarget::Donation(DonationId(7));
        assert_eq!(target.to_string(), "donation#7");
    }

    #[test]
    fn test_handle_display_is_hex() {
        let handle = CiphertextHandle([0xAB; 32]);
        assert!(handle.to_string().starts_with("0xabab"));
        assert_eq!(handle.to_string().len(), 66);
    }
}
