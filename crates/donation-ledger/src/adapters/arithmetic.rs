//! Homomorphic Arithmetic Adapter
//!
//! Implements `HomomorphicArithmetic` with a transparent reference scheme:
//! a handle is the keccak-256 of the value it stands for, and a registry
//! maps handles back to values so `add` can be computed. Equal values always
//! get equal handles, so `add(zero(), encode(a)) == encode(a)`.
//!
//! Nothing here is confidential. It exists to drive the ledger in tests and
//! the demo without an FHE backend.

use crate::domain::{CiphertextHandle, LedgerError};
use crate::ports::outbound::HomomorphicArithmetic;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;

const DOMAIN_TAG: &[u8] = b"ledger.transparent";

/// Transparent reference arithmetic over `u32` with wrapping addition.
pub struct TransparentArithmetic {
    values: RwLock<HashMap<CiphertextHandle, u32>>,
}

impl TransparentArithmetic {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    fn handle_for(value: u32) -> CiphertextHandle {
        let mut hasher = Keccak256::new();
        hasher.update(DOMAIN_TAG);
        hasher.update(value.to_be_bytes());
        CiphertextHandle(hasher.finalize().into())
    }

    fn register(&self, value: u32) -> CiphertextHandle {
        let handle = Self::handle_for(value);
        self.values.write().insert(handle, value);
        handle
    }

    fn value_of(&self, handle: &CiphertextHandle) -> Result<u32, LedgerError> {
        self.values
            .read()
            .get(handle)
            .copied()
            .ok_or_else(|| LedgerError::Arithmetic(format!("unknown handle {:?}", handle)))
    }

    /// Plaintext behind a handle produced by this adapter.
    pub fn reveal(&self, handle: &CiphertextHandle) -> Option<u32> {
        self.values.read().get(handle).copied()
    }
}

impl Default for TransparentArithmetic {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HomomorphicArithmetic for TransparentArithmetic {
    async fn zero(&self) -> Result<CiphertextHandle, LedgerError> {
        Ok(self.register(0))
    }

    async fn add(
        &self,
        lhs: CiphertextHandle,
        rhs: CiphertextHandle,
    ) -> Result<CiphertextHandle, LedgerError> {
        let sum = self.value_of(&lhs)?.wrapping_add(self.value_of(&rhs)?);
        Ok(self.register(sum))
    }

    async fn encode(&self, value: u32) -> Result<CiphertextHandle, LedgerError> {
        Ok(self.register(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_additive_identity() {
        let arith = TransparentArithmetic::new();
        let zero = arith.zero().await.unwrap();
        let a = arith.encode(500).await.unwrap();
        assert_eq!(arith.add(zero, a).await.unwrap(), a);
    }

    #[tokio::test]
    async fn test_add() {
        let arith = TransparentArithmetic::new();
        let a = arith.encode(2).await.unwrap();
        let b = arith.encode(3).await.unwrap();
        let sum = arith.add(a, b).await.unwrap();
        assert_eq!(arith.reveal(&sum), Some(5));
        assert_eq!(sum, arith.encode(5).await.unwrap());
    }

    #[tokio::test]
    async fn test_wrapping() {
        let arith = TransparentArithmetic::new();
        let a = arith.encode(u32::MAX).await.unwrap();
        let b = arith.encode(2).await.unwrap();
        assert_eq!(arith.reveal(&arith.add(a, b).await.unwrap()), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_handle() {
        let arith = TransparentArithmetic::new();
        let zero = arith.zero().await.unwrap();
        let result = arith.add(zero, CiphertextHandle([7; 32])).await;
        assert!(matches!(result, Err(LedgerError::Arithmetic(_))));
    }
}
