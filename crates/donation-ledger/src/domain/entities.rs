//! # Domain Entities
//!
//! Core entities for the Donation Decryption Request Ledger.

use super::errors::LedgerError;
use super::invariants::invariant_supported_abi_version;
use super::value_objects::{CiphertextHandle, DecryptionTarget, DonationId, RequestId, RequestState};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Cleartext ABI versions this crate can decode.
pub const SUPPORTED_ABI_VERSIONS: &[u8] = &[1];

/// Encrypted donation as submitted.
///
/// Immutable once recorded; only the paired [`DecryptedDonation`] changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedDonation {
    /// Sequential identifier.
    pub id: DonationId,
    /// Encrypted amount.
    pub encrypted_amount: CiphertextHandle,
    /// Encrypted lobbying entity name.
    pub encrypted_entity: CiphertextHandle,
    /// Encrypted donor name.
    pub encrypted_donor: CiphertextHandle,
    /// Creation timestamp.
    pub timestamp: u64,
}

impl EncryptedDonation {
    /// Handles in the order the oracle decrypts them: amount, entity, donor.
    pub fn handles(&self) -> [CiphertextHandle; 3] {
        [
            self.encrypted_amount,
            self.encrypted_entity,
            self.encrypted_donor,
        ]
    }
}

/// Revealed plaintext of a donation.
///
/// Starts as a zero/empty placeholder. Callers must check `is_revealed`
/// before trusting the other fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedDonation {
    /// Donation amount.
    pub amount: u32,
    /// Lobbying entity name.
    pub entity: String,
    /// Donor name.
    pub donor: String,
    /// Set once by the single successful decryption callback.
    pub is_revealed: bool,
}

impl DecryptedDonation {
    /// Write the plaintext triple and freeze it.
    pub fn reveal(
        &mut self,
        id: DonationId,
        amount: u32,
        entity: String,
        donor: String,
    ) -> Result<(), LedgerError> {
        if self.is_revealed {
            return Err(LedgerError::AlreadyRevealed(id));
        }
        self.amount = amount;
        self.entity = entity;
        self.donor = donor;
        self.is_revealed = true;
        Ok(())
    }
}

/// Running encrypted total for one entity or donor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedAggregate {
    /// Encrypted running sum.
    pub total: CiphertextHandle,
    /// Number of revealed donations folded in.
    pub contributions: u64,
    /// Last total delivered by an aggregate decryption, if any.
    pub revealed_total: Option<u32>,
    /// Timestamp of the last fold.
    pub updated_at: u64,
}

/// Encrypted edge between two entities, kept for external graph analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedConnection {
    /// First entity.
    pub entity1: CiphertextHandle,
    /// Second entity.
    pub entity2: CiphertextHandle,
    /// Edge weight.
    pub weight: CiphertextHandle,
    /// Append timestamp.
    pub recorded_at: u64,
}

/// Decryption request as seen by the tracker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRequest {
    /// Oracle-issued identifier.
    pub request_id: RequestId,
    /// What the callback will reveal.
    pub target: DecryptionTarget,
    /// `Requested` until the callback is processed, then `Fulfilled`.
    pub state: RequestState,
    /// When the request was issued.
    pub requested_at: u64,
    /// When the callback was processed.
    pub fulfilled_at: Option<u64>,
}

/// Ledger configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Allow a second oracle request for a target whose first request is
    /// still outstanding.
    pub allow_overlapping_requests: bool,
    /// Cleartext ABI layout version used to decode callbacks.
    pub cleartext_abi_version: u8,
    /// Longest entity/donor name accepted from a callback, in bytes.
    pub max_name_len: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            allow_overlapping_requests: false,
            cleartext_abi_version: 1,
            max_name_len: 256,
        }
    }
}

impl LedgerConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LEDGER_ALLOW_OVERLAPPING_REQUESTS") {
            config.allow_overlapping_requests = val == "1" || val.to_lowercase() == "true";
        }
        if let Ok(val) = std::env::var("LEDGER_CLEARTEXT_ABI_VERSION") {
            match val.parse() {
                Ok(v) => config.cleartext_abi_version = v,
                Err(_) => warn!("LEDGER_CLEARTEXT_ABI_VERSION must be an integer, got {:?}", val),
            }
        }
        if let Ok(val) = std::env::var("LEDGER_MAX_NAME_LEN") {
            match val.parse() {
                Ok(v) => config.max_name_len = v,
                Err(_) => warn!("LEDGER_MAX_NAME_LEN must be an integer, got {:?}", val),
            }
        }

        config
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), LedgerError> {
        invariant_supported_abi_version(self.cleartext_abi_version)?;
        if self.max_name_len == 0 {
            return Err(LedgerError::InvalidConfig(
                "max_name_len must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_unrevealed() {
        let view = DecryptedDonation::default();
        assert!(!view.is_revealed);
        assert_eq!(view.amount, 0);
        assert!(view.entity.is_empty());
        assert!(view.donor.is_empty());
    }

    #[test]
    fn test_reveal_once() {
        let mut view = DecryptedDonation::default();
        view.reveal(DonationId(1), 500, "EntityA".into(), "DonorX".into())
            .unwrap();
        assert!(view.is_revealed);
        assert_eq!(view.amount, 500);
    }

    #[test]
    fn test_second_reveal_rejected_and_frozen() {
        let mut view = DecryptedDonation::default();
        view.reveal(DonationId(1), 500, "EntityA".into(), "DonorX".into())
            .unwrap();
        let err = view
            .reveal(DonationId(1), 1, "Other".into(), "Other".into())
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyRevealed(DonationId(1))));
        assert_eq!(view.amount, 500);
        assert_eq!(view.entity, "EntityA");
    }

    #[test]
    fn test_handles_order() {
        let donation = EncryptedDonation {
            id: DonationId(1),
            encrypted_amount: CiphertextHandle([1; 32]),
            encrypted_entity: CiphertextHandle([2; 32]),
            encrypted_donor: CiphertextHandle([3; 32]),
            timestamp: 0,
        };
        let handles = donation.handles();
        assert_eq!(handles[0], CiphertextHandle([1; 32]));
        assert_eq!(handles[2], CiphertextHandle([3; 32]));
    }

    #[test]
    fn test_config_default() {
        let config = LedgerConfig::default();
        assert!(!config.allow_overlapping_requests);
        assert_eq!(config.cleartext_abi_version, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_unknown_abi_version() {
        let config = LedgerConfig {
            cleartext_abi_version: 9,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LedgerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_name_len() {
        let config = LedgerConfig {
            max_name_len: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = LedgerConfig {
            allow_overlapping_requests: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
