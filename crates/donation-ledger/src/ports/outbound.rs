//! # Outbound Ports
//!
//! Traits for the external services the ledger depends on but does not
//! implement: decryption oracle, proof verification, homomorphic arithmetic,
//! authorization, event publication and time.

use crate::domain::{Address, CiphertextHandle, LedgerAction, LedgerError, RequestId};
use crate::events::LedgerEvent;
use async_trait::async_trait;

/// Decryption oracle - outbound port.
///
/// Decrypts off-ledger and later calls back with
/// `(request_id, cleartexts, proof)`.
#[async_trait]
pub trait DecryptionOracle: Send + Sync {
    /// Submit ciphertext handles for decryption and return the request id
    /// the callback will carry.
    async fn submit_ciphertexts(
        &self,
        handles: &[CiphertextHandle],
    ) -> Result<RequestId, LedgerError>;
}

/// Signature/proof verifier - outbound port.
///
/// Must be consulted before trusting callback cleartexts.
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    /// Check that `proof` binds `cleartexts` to `request_id`.
    async fn verify(
        &self,
        request_id: RequestId,
        cleartexts: &[u8],
        proof: &[u8],
    ) -> Result<bool, LedgerError>;
}

/// Homomorphic arithmetic service - outbound port.
///
/// Handles are never inspected by the ledger.
#[async_trait]
pub trait HomomorphicArithmetic: Send + Sync {
    /// Encrypted zero.
    async fn zero(&self) -> Result<CiphertextHandle, LedgerError>;

    /// Encrypted sum of two handles.
    async fn add(
        &self,
        lhs: CiphertextHandle,
        rhs: CiphertextHandle,
    ) -> Result<CiphertextHandle, LedgerError>;

    /// Trivially encrypt a plaintext value.
    async fn encode(&self, value: u32) -> Result<CiphertextHandle, LedgerError>;
}

/// Capability check for privileged operations - outbound port.
pub trait AccessPolicy: Send + Sync {
    /// `Ok(())` if `caller` may perform `action`.
    fn authorize(&self, caller: &Address, action: LedgerAction) -> Result<(), LedgerError>;
}

/// Event publisher - outbound port.
///
/// Called after a mutation has been committed.
pub trait LedgerEventPublisher: Send + Sync {
    /// Publish one notification.
    fn publish(&self, event: LedgerEvent) -> Result<(), PublishError>;
}

/// Error type for publish operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    /// The event sink is not connected.
    #[error("Event sink not connected")]
    NotConnected,
}

/// Time source trait for testability.
pub trait TimeSource: Send + Sync {
    /// Seconds since UNIX epoch.
    fn now(&self) -> u64;
}
