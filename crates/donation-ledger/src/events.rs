//! # Event Schema
//!
//! Notifications emitted after a ledger mutation commits. They are
//! observable records, not RPC: consumers cannot influence the operation
//! that produced them.
//!
//! | Event | Emitted by |
//! |-------|-----------|
//! | `Recorded` | `record_donation` |
//! | `DecryptionRequested` | `request_decryption` |
//! | `Decrypted` | `fulfill_donation_decryption` |
//! | `ConnectionRecorded` | `record_connection` |
//! | `AggregateDecryptionRequested` | `request_aggregate_decryption` |
//! | `AggregateDecrypted` | `fulfill_aggregate_decryption` |

use crate::domain::{AggregateKey, DonationId, RequestId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Topics for ledger events.
pub mod topics {
    /// Donation lifecycle events.
    pub const DONATIONS: &str = "ledger.donations";
    /// Aggregate decryption events.
    pub const AGGREGATES: &str = "ledger.aggregates";
    /// Connection log events.
    pub const CONNECTIONS: &str = "ledger.connections";
}

/// Ledger notification payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEventKind {
    /// A donation was recorded.
    Recorded {
        /// New donation id
        id: DonationId,
    },
    /// Decryption was requested for a donation.
    DecryptionRequested {
        /// Target donation
        id: DonationId,
        /// Oracle request id
        request_id: RequestId,
    },
    /// A donation was revealed.
    Decrypted {
        /// Revealed donation
        id: DonationId,
    },
    /// A connection was appended.
    ConnectionRecorded {
        /// Log index
        index: usize,
    },
    /// Decryption was requested for an aggregate total.
    AggregateDecryptionRequested {
        /// Target aggregate
        key: AggregateKey,
        /// Oracle request id
        request_id: RequestId,
    },
    /// An aggregate total was decrypted.
    AggregateDecrypted {
        /// Decrypted aggregate
        key: AggregateKey,
        /// Cleartext total
        total: u32,
    },
}

impl LedgerEventKind {
    /// Topic this event is published on.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Recorded { .. } | Self::DecryptionRequested { .. } | Self::Decrypted { .. } => {
                topics::DONATIONS
            }
            Self::ConnectionRecorded { .. } => topics::CONNECTIONS,
            Self::AggregateDecryptionRequested { .. } | Self::AggregateDecrypted { .. } => {
                topics::AGGREGATES
            }
        }
    }
}

/// Event envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Unique event id.
    pub event_id: Uuid,
    /// Commit timestamp.
    pub timestamp: u64,
    /// Payload.
    pub kind: LedgerEventKind,
}

impl LedgerEvent {
    /// Wrap a payload with a fresh id.
    pub fn new(kind: LedgerEventKind, timestamp: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics() {
        assert_eq!(
            LedgerEventKind::Recorded { id: DonationId(1) }.topic(),
            topics::DONATIONS
        );
        assert_eq!(
            LedgerEventKind::ConnectionRecorded { index: 0 }.topic(),
            topics::CONNECTIONS
        );
        assert_eq!(
            LedgerEventKind::AggregateDecrypted {
                key: AggregateKey::entity("E"),
                total: 1
            }
            .topic(),
            topics::AGGREGATES
        );
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = LedgerEvent::new(
            LedgerEventKind::DecryptionRequested {
                id: DonationId(1),
                request_id: RequestId(7),
            },
            100,
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["type"], "decryption_requested");
        assert_eq!(json["kind"]["request_id"], 7);
        assert_eq!(json["timestamp"], 100);
    }

    #[test]
    fn test_event_ids_unique() {
        let a = LedgerEvent::new(LedgerEventKind::Decrypted { id: DonationId(1) }, 0);
        let b = LedgerEvent::new(LedgerEventKind::Decrypted { id: DonationId(1) }, 0);
        assert_ne!(a.event_id, b.event_id);
    }
}
