//! Proof Verifier Adapter
//!
//! Implements `ProofVerifier` with HMAC-SHA256 over the request id and the
//! cleartext bytes. The oracle holds the same key and signs its callbacks
//! with [`HmacProofVerifier::sign`].

use crate::domain::{LedgerError, RequestId};
use crate::ports::outbound::ProofVerifier;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 proof verifier.
pub struct HmacProofVerifier {
    key: Vec<u8>,
}

impl HmacProofVerifier {
    /// Create a verifier for a shared oracle key.
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, LedgerError> {
        let key = key.into();
        if key.is_empty() {
            return Err(LedgerError::InvalidConfig(
                "oracle key must not be empty".to_string(),
            ));
        }
        Ok(Self { key })
    }

    fn mac(&self, request_id: RequestId, cleartexts: &[u8]) -> Result<HmacSha256, LedgerError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| LedgerError::InvalidConfig(format!("oracle key: {}", e)))?;
        mac.update(&request_id.to_be_bytes());
        mac.update(cleartexts);
        Ok(mac)
    }

    /// Proof the oracle attaches to a callback.
    pub fn sign(&self, request_id: RequestId, cleartexts: &[u8]) -> Result<Vec<u8>, LedgerError> {
        Ok(self
            .mac(request_id, cleartexts)?
            .finalize()
            .into_bytes()
            .to_vec())
    }
}

#[async_trait]
impl ProofVerifier for HmacProofVerifier {
    async fn verify(
        &self,
        request_id: RequestId,
        cleartexts: &[u8],
        proof: &[u8],
    ) -> Result<bool, LedgerError> {
        // Constant-time comparison
        let valid = self
            .mac(request_id, cleartexts)?
            .verify_slice(proof)
            .is_ok();
        debug!("[ledger] Proof for request {} valid={}", request_id, valid);
        Ok(valid)
    }
}
