//! Decryption Oracle Adapter
//!
//! Implements `DecryptionOracle` by recording submissions in memory. The
//! callback side is driven by the caller (tests, the demo binary).

use crate::domain::{CiphertextHandle, LedgerError, RequestId};
use crate::ports::outbound::DecryptionOracle;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// In-memory decryption oracle.
///
/// Issues sequential request ids starting at 1.
pub struct InMemoryDecryptionOracle {
    /// Submitted handles per request.
    submissions: RwLock<BTreeMap<RequestId, Vec<CiphertextHandle>>>,
    /// Last issued id.
    last_id: RwLock<u64>,
    /// Reject submissions when set.
    should_fail: RwLock<bool>,
}

impl InMemoryDecryptionOracle {
    /// Create a new oracle.
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(BTreeMap::new()),
            last_id: RwLock::new(0),
            should_fail: RwLock::new(false),
        }
    }

    /// Make subsequent submissions fail.
    pub fn set_failing(&self, failing: bool) {
        *self.should_fail.write() = failing;
    }

    /// Handles submitted under `request_id`.
    pub fn submitted(&self, request_id: RequestId) -> Option<Vec<CiphertextHandle>> {
        self.submissions.read().get(&request_id).cloned()
    }

    /// Number of requests issued.
    pub fn request_count(&self) -> usize {
        self.submissions.read().len()
    }
}

impl Default for InMemoryDecryptionOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecryptionOracle for InMemoryDecryptionOracle {
    async fn submit_ciphertexts(
        &self,
        handles: &[CiphertextHandle],
    ) -> Result<RequestId, LedgerError> {
        if *self.should_fail.read() {
            return Err(LedgerError::Oracle("oracle unavailable".to_string()));
        }
        if handles.is_empty() {
            return Err(LedgerError::Oracle("empty ciphertext list".to_string()));
        }

        let request_id = {
            let mut last = self.last_id.write();
            *last += 1;
            RequestId(*last)
        };
        self.submissions.write().insert(request_id, handles.to_vec());

        debug!(
            "[ledger] Oracle accepted {} handle(s) as request {}",
            handles.len(),
            request_id
        );
        Ok(request_id)
    }
}
