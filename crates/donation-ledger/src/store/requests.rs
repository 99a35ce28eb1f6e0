//! # Request Tracker
//!
//! Maps oracle request ids to their decryption targets.
//!
//! Request ids are the deduplication key for callbacks: an id moves from
//! `Requested` to `Fulfilled` exactly once and is never removed, so a replayed
//! callback finds it `Fulfilled` and is rejected.

use crate::domain::{
    invariant_request_outstanding, DecryptionTarget, LedgerError, RequestId, RequestState,
    TrackedRequest,
};
use std::collections::{HashMap, HashSet};

/// Outstanding and fulfilled decryption requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestTracker {
    requests: HashMap<RequestId, TrackedRequest>,
    /// Outstanding request ids per target, in issue order.
    outstanding: HashMap<DecryptionTarget, Vec<RequestId>>,
    /// Targets with at least one processed callback.
    fulfilled: HashSet<DecryptionTarget>,
}

impl RequestTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest outstanding request for `target`.
    pub fn outstanding_for(&self, target: &DecryptionTarget) -> Option<RequestId> {
        self.outstanding
            .get(target)
            .and_then(|ids| ids.first().copied())
    }

    /// Reject an oracle id that is already tracked.
    pub fn ensure_untracked(&self, request_id: RequestId) -> Result<(), LedgerError> {
        if self.requests.contains_key(&request_id) {
            return Err(LedgerError::Oracle(format!(
                "oracle reissued request id {}",
                request_id
            )));
        }
        Ok(())
    }

    /// Record `request_id -> target` in the `Requested` state.
    pub fn track(
        &mut self,
        request_id: RequestId,
        target: DecryptionTarget,
        now: u64,
    ) -> Result<(), LedgerError> {
        self.ensure_untracked(request_id)?;
        self.outstanding
            .entry(target.clone())
            .or_default()
            .push(request_id);
        self.requests.insert(
            request_id,
            TrackedRequest {
                request_id,
                target,
                state: RequestState::Requested,
                requested_at: now,
                fulfilled_at: None,
            },
        );
        Ok(())
    }

    /// Request in the `Requested` state, or `UnknownOrReplayedRequest`.
    pub fn outstanding(&self, request_id: RequestId) -> Result<&TrackedRequest, LedgerError> {
        invariant_request_outstanding(request_id, self.requests.get(&request_id))
    }

    /// Consume `request_id`: `Requested -> Fulfilled`.
    pub fn fulfill(&mut self, request_id: RequestId, now: u64) -> Result<(), LedgerError> {
        let req = self
            .requests
            .get_mut(&request_id)
            .filter(|req| req.state.can_transition_to(RequestState::Fulfilled))
            .ok_or(LedgerError::UnknownOrReplayedRequest(request_id))?;
        req.state = RequestState::Fulfilled;
        req.fulfilled_at = Some(now);
        let target = req.target.clone();

        if let Some(ids) = self.outstanding.get_mut(&target) {
            ids.retain(|id| *id != request_id);
            if ids.is_empty() {
                self.outstanding.remove(&target);
            }
        }
        self.fulfilled.insert(target);
        Ok(())
    }

    /// Tracked request by id, in any state.
    pub fn get(&self, request_id: RequestId) -> Option<&TrackedRequest> {
        self.requests.get(&request_id)
    }

    /// Current state of a target.
    ///
    /// A donation is `Fulfilled` once any of its requests has been processed,
    /// even if an overlapping request is still outstanding. An aggregate with
    /// an outstanding request reports `Requested` even if an earlier request
    /// for it was fulfilled (aggregates can be re-requested).
    pub fn state_of(&self, target: &DecryptionTarget) -> RequestState {
        let fulfilled = self.fulfilled.contains(target);
        match target {
            DecryptionTarget::Donation(_) if fulfilled => RequestState::Fulfilled,
            _ if self.outstanding.contains_key(target) => RequestState::Requested,
            _ if fulfilled => RequestState::Fulfilled,
            _ => RequestState::NoRequest,
        }
    }

    /// All requests still `Requested`, ordered by id.
    pub fn pending(&self) -> Vec<&TrackedRequest> {
        let mut pending: Vec<_> = self
            .requests
            .values()
            .filter(|req| req.state == RequestState::Requested)
            .collect();
        pending.sort_by_key(|req| req.request_id);
        pending
    }

    /// Number of tracked requests in any state.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether no request has been tracked.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
