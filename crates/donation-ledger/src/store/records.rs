//! # Record Store
//!
//! Encrypted donations and their paired reveal slots.

use crate::domain::{
    CiphertextHandle, DecryptedDonation, DonationId, EncryptedDonation, LedgerError,
};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
struct DonationSlot {
    encrypted: EncryptedDonation,
    decrypted: DecryptedDonation,
}

/// Donation records keyed by sequential id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordStore {
    slots: BTreeMap<DonationId, DonationSlot>,
    last_id: u64,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new donation under the next id with an unrevealed placeholder.
    pub fn record(
        &mut self,
        encrypted_amount: CiphertextHandle,
        encrypted_entity: CiphertextHandle,
        encrypted_donor: CiphertextHandle,
        timestamp: u64,
    ) -> DonationId {
        self.last_id += 1;
        let id = DonationId(self.last_id);
        self.slots.insert(
            id,
            DonationSlot {
                encrypted: EncryptedDonation {
                    id,
                    encrypted_amount,
                    encrypted_entity,
                    encrypted_donor,
                    timestamp,
                },
                decrypted: DecryptedDonation::default(),
            },
        );
        id
    }

    /// Encrypted record.
    pub fn encrypted(&self, id: DonationId) -> Result<&EncryptedDonation, LedgerError> {
        self.slots
            .get(&id)
            .map(|slot| &slot.encrypted)
            .ok_or(LedgerError::DonationNotFound(id))
    }

    /// Reveal slot. Zero/empty until `is_revealed`.
    pub fn decrypted_view(&self, id: DonationId) -> Result<&DecryptedDonation, LedgerError> {
        self.slots
            .get(&id)
            .map(|slot| &slot.decrypted)
            .ok_or(LedgerError::DonationNotFound(id))
    }

    /// Freeze the plaintext triple for `id`.
    pub fn reveal(
        &mut self,
        id: DonationId,
        amount: u32,
        entity: String,
        donor: String,
    ) -> Result<(), LedgerError> {
        let slot = self
            .slots
            .get_mut(&id)
            .ok_or(LedgerError::DonationNotFound(id))?;
        slot.decrypted.reveal(id, amount, entity, donor)
    }

    /// Number of recorded donations.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
