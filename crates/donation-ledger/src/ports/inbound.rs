//! # Inbound Ports
//!
//! API trait defining what the ledger can do.

use crate::domain::{
    Address, AggregateKey, AggregateKind, CiphertextHandle, DecryptedDonation, DecryptionTarget,
    DonationId, EncryptedAggregate, EncryptedConnection, EncryptedDonation, LedgerError, NameHash,
    RequestId, RequestState, TrackedRequest,
};
use async_trait::async_trait;

/// Donation ledger API - inbound port.
///
/// Mutating operations take `&mut self`: the ledger is a single logical
/// writer and each call is one all-or-nothing transaction.
#[async_trait]
pub trait DonationLedgerApi: Send + Sync {
    /// Record an encrypted donation and return its id.
    async fn record_donation(
        &mut self,
        caller: Address,
        encrypted_amount: CiphertextHandle,
        encrypted_entity: CiphertextHandle,
        encrypted_donor: CiphertextHandle,
    ) -> Result<DonationId, LedgerError>;

    /// Ask the oracle to decrypt a donation.
    async fn request_decryption(
        &mut self,
        caller: Address,
        id: DonationId,
    ) -> Result<RequestId, LedgerError>;

    /// Oracle callback for a donation decryption.
    async fn fulfill_donation_decryption(
        &mut self,
        caller: Address,
        request_id: RequestId,
        cleartexts: &[u8],
        proof: &[u8],
    ) -> Result<DonationId, LedgerError>;

    /// Ask the oracle to decrypt an aggregate total.
    async fn request_aggregate_decryption(
        &mut self,
        caller: Address,
        key: AggregateKey,
    ) -> Result<RequestId, LedgerError>;

    /// Oracle callback for an aggregate decryption.
    async fn fulfill_aggregate_decryption(
        &mut self,
        caller: Address,
        request_id: RequestId,
        cleartexts: &[u8],
        proof: &[u8],
    ) -> Result<(AggregateKey, u32), LedgerError>;

    /// Append an encrypted connection and return its index.
    async fn record_connection(
        &mut self,
        caller: Address,
        entity1: CiphertextHandle,
        entity2: CiphertextHandle,
        weight: CiphertextHandle,
    ) -> Result<usize, LedgerError>;

    /// Reveal slot of a donation. Zero/empty until `is_revealed`.
    fn get_decrypted_view(&self, id: DonationId) -> Result<&DecryptedDonation, LedgerError>;

    /// Encrypted donation record.
    fn get_encrypted_donation(&self, id: DonationId) -> Result<&EncryptedDonation, LedgerError>;

    /// Number of recorded donations.
    fn donation_count(&self) -> usize;

    /// Connection log entry.
    fn get_connection(&self, index: usize) -> Option<&EncryptedConnection>;

    /// Number of connection log entries.
    fn connection_count(&self) -> usize;

    /// Aggregate total for a key.
    fn get_aggregate(&self, key: &AggregateKey) -> Option<&EncryptedAggregate>;

    /// Last decrypted total for an aggregate.
    fn revealed_aggregate_total(&self, key: &AggregateKey) -> Option<u32>;

    /// Registered names in discovery order.
    fn aggregate_names(&self, kind: AggregateKind) -> &[String];

    /// Recover a registered name from its hash.
    fn lookup_by_hash(&self, kind: AggregateKind, hash: &NameHash) -> Result<&str, LedgerError>;

    /// Request state of a target.
    fn request_state(&self, target: &DecryptionTarget) -> RequestState;

    /// Requests still waiting for a callback.
    fn pending_requests(&self) -> Vec<&TrackedRequest>;
}
