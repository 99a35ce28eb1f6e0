//! # Domain Invariants
//!
//! Preconditions checked before any ledger mutation.

use super::entities::{DecryptedDonation, TrackedRequest, SUPPORTED_ABI_VERSIONS};
use super::errors::LedgerError;
use super::value_objects::{DecryptionTarget, DonationId, RequestId, RequestState};

/// Invariant: a donation is revealed at most once.
///
/// Requesting or fulfilling a decryption for a revealed donation is rejected.
pub fn invariant_not_revealed(
    id: DonationId,
    view: &DecryptedDonation,
) -> Result<(), LedgerError> {
    if view.is_revealed {
        return Err(LedgerError::AlreadyRevealed(id));
    }
    Ok(())
}

/// Invariant: a request id is consumed by at most one callback.
///
/// Unknown ids and ids already `Fulfilled` are indistinguishable to the
/// caller.
pub fn invariant_request_outstanding(
    request_id: RequestId,
    tracked: Option<&TrackedRequest>,
) -> Result<&TrackedRequest, LedgerError> {
    match tracked {
        Some(req) if req.state == RequestState::Requested => Ok(req),
        _ => Err(LedgerError::UnknownOrReplayedRequest(request_id)),
    }
}

/// Invariant: one live oracle request per target, unless overlaps are
/// explicitly allowed.
pub fn invariant_no_overlapping_request(
    target: &DecryptionTarget,
    outstanding: Option<RequestId>,
    allow_overlapping: bool,
) -> Result<(), LedgerError> {
    match outstanding {
        Some(request_id) if !allow_overlapping => Err(LedgerError::RequestAlreadyPending {
            target: target.clone(),
            request_id,
        }),
        _ => Ok(()),
    }
}

/// Invariant: callbacks are decoded with a known cleartext layout.
pub fn invariant_supported_abi_version(version: u8) -> Result<(), LedgerError> {
    if !SUPPORTED_ABI_VERSIONS.contains(&version) {
        return Err(LedgerError::InvalidConfig(format!(
            "unsupported cleartext ABI version {}",
            version
        )));
    }
    Ok(())
}

/// Invariant: decoded names stay within the configured bound.
pub fn invariant_name_len(name: &str, max_len: usize) -> Result<(), LedgerError> {
    if name.len() > max_len {
        return Err(LedgerError::MalformedCleartext(format!(
            "name of {} bytes exceeds limit {}",
            name.len(),
            max_len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(state: RequestState) -> TrackedRequest {
        TrackedRequest {
            request_id: RequestId(1),
            target: DecryptionTarget::Donation(DonationId(1)),
            state,
            requested_at: 0,
            fulfilled_at: None,
        }
    }

    #[test]
    fn test_abi_version_gate() {
        assert!(invariant_supported_abi_version(1).is_ok());
        assert!(matches!(
            invariant_supported_abi_version(0),
            Err(LedgerError::InvalidConfig(_))
        ));
        assert!(invariant_supported_abi_version(2).is_err());
    }

    #[test]
    fn test_not_revealed_pass() {
        assert!(invariant_not_revealed(DonationId(1), &DecryptedDonation::default()).is_ok());
    }

    #[test]
    fn test_not_revealed_fail() {
        let view = DecryptedDonation {
            is_revealed: true,
            ..Default::default()
        };
        assert!(matches!(
            invariant_not_revealed(DonationId(1), &view),
            Err(LedgerError::AlreadyRevealed(_))
        ));
    }

    #[test]
    fn test_request_outstanding() {
        let req = tracked(RequestState::Requested);
        assert!(invariant_request_outstanding(RequestId(1), Some(&req)).is_ok());
    }

    #[test]
    fn test_request_fulfilled_is_replay() {
        let req = tracked(RequestState::Fulfilled);
        assert!(matches!(
            invariant_request_outstanding(RequestId(1), Some(&req)),
            Err(LedgerError::UnknownOrReplayedRequest(RequestId(1)))
        ));
    }

    #[test]
    fn test_request_unknown() {
        assert!(matches!(
            invariant_request_outstanding(RequestId(5), None),
            Err(LedgerError::UnknownOrReplayedRequest(RequestId(5)))
        ));
    }

    #[test]
    fn test_overlap_rejected_by_default() {
        let target = DecryptionTarget::Donation(DonationId(1));
        assert!(matches!(
            invariant_no_overlapping_request(&target, Some(RequestId(3)), false),
            Err(LedgerError::RequestAlreadyPending { .. })
        ));
    }

    #[test]
    fn test_overlap_allowed_when_configured() {
        let target = DecryptionTarget::Donation(DonationId(1));
        assert!(invariant_no_overlapping_request(&target, Some(RequestId(3)), true).is_ok());
        assert!(invariant_no_overlapping_request(&target, None, false).is_ok());
    }

    #[test]
    fn test_name_len() {
        assert!(invariant_name_len("abc", 3).is_ok());
        assert!(invariant_name_len("abcd", 3).is_err());
    }
}
