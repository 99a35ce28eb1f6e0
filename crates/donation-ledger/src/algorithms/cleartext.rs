//! # Cleartext Codec
//!
//! Decodes the oracle's cleartext payloads.
//!
//! ## Layout (version 1)
//!
//! Solidity `abi.encode` parameters, 32-byte big-endian words.
//!
//! ```text
//! donation:  [amount:uint32][offset entity][offset donor] [len][utf8..pad] [len][utf8..pad]
//! aggregate: [total:uint32]
//! ```
//!
//! Offsets are measured from the start of the payload. Decoding validates
//! word bounds, `uint32` range and UTF-8.

use crate::domain::{invariant_supported_abi_version, LedgerError};
use alloy_sol_types::SolValue;

/// ABI word size.
pub const WORD: usize = 32;

/// Decoded donation cleartexts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DonationCleartext {
    /// Donation amount.
    pub amount: u32,
    /// Lobbying entity name.
    pub entity: String,
    /// Donor name.
    pub donor: String,
}

/// Versioned cleartext codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CleartextCodec {
    version: u8,
}

impl CleartextCodec {
    /// Codec for a layout version.
    pub fn new(version: u8) -> Result<Self, LedgerError> {
        invariant_supported_abi_version(version)?;
        Ok(Self { version })
    }

    /// Layout version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Decode `(uint32 amount, string entity, string donor)`.
    pub fn decode_donation(&self, bytes: &[u8]) -> Result<DonationCleartext, LedgerError> {
        let (amount, entity, donor) =
            <(u32, String, String)>::abi_decode_params(bytes, true).map_err(malformed)?;
        Ok(DonationCleartext {
            amount,
            entity,
            donor,
        })
    }

    /// Decode `(uint32 total)`.
    pub fn decode_aggregate(&self, bytes: &[u8]) -> Result<u32, LedgerError> {
        if bytes.len() != WORD {
            return Err(LedgerError::MalformedCleartext(format!(
                "aggregate payload must be {} bytes, got {}",
                WORD,
                bytes.len()
            )));
        }
        u32::abi_decode(bytes, true).map_err(malformed)
    }

    /// Encode a donation payload.
    pub fn encode_donation(&self, cleartext: &DonationCleartext) -> Vec<u8> {
        (
            cleartext.amount,
            cleartext.entity.clone(),
            cleartext.donor.clone(),
        )
            .abi_encode_params()
    }

    /// Encode an aggregate payload.
    pub fn encode_aggregate(&self, total: u32) -> Vec<u8> {
        total.abi_encode()
    }
}

impl Default for CleartextCodec {
    fn default() -> Self {
        Self { version: 1 }
    }
}

fn malformed(e: alloy_sol_types::Error) -> LedgerError {
    LedgerError::MalformedCleartext(format!("abi decode: {}", e))
}
