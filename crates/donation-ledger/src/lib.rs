//! # Donation Ledger
//!
//! Encrypted political-donation records with an oracle-mediated decryption
//! protocol.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Donations arrive as opaque ciphertext handles. A donation is revealed only
//! through a two-phase exchange with an external decryption oracle:
//! - `request_decryption` submits the donation's handles and tracks the
//!   returned request id
//! - `fulfill_donation_decryption` accepts the oracle callback once, verifies
//!   its proof, writes the reveal slot and folds the amount into encrypted
//!   per-entity and per-donor totals
//!
//! ## Protocol Guarantees
//!
//! | Guarantee | Enforced by |
//! |-----------|-------------|
//! | Reveal at most once | `AlreadyRevealed` checked on request and on callback |
//! | Callback consumed once | Request id `Requested -> Fulfilled` in `RequestTracker` |
//! | Cleartexts authenticated | `ProofVerifier` before any decoding |
//! | All-or-nothing calls | Prepare/commit split in `DonationLedgerService` |
//!
//! ## Module Structure
//!
//! ```text
//! donation-ledger/
//! ├── domain/          # Entities, value objects, errors, invariants
//! ├── algorithms/      # Cleartext ABI codec, name hashing
//! ├── store/           # Records, aggregates, requests, connections
//! ├── ports/           # DonationLedgerApi, oracle/verifier/arithmetic ports
//! ├── adapters/        # In-memory and HMAC adapters
//! ├── events.rs        # Ledger notifications
//! └── service.rs       # DonationLedgerService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;
pub mod store;

// Re-exports
pub use adapters::{
    AllowAllPolicy, FixedTimeSource, HmacProofVerifier, InMemoryDecryptionOracle, NoOpPublisher,
    RecordingPublisher, RoleBasedPolicy, SystemTimeSource, TransparentArithmetic,
};
pub use algorithms::{name_hash, CleartextCodec, DonationCleartext};
pub use domain::{
    Address, AggregateKey, AggregateKind, CiphertextHandle, DecryptedDonation, DecryptionTarget,
    DonationId, EncryptedAggregate, EncryptedConnection, EncryptedDonation, LedgerAction,
    LedgerConfig, LedgerError, NameHash, RequestId, RequestState, TrackedRequest,
};
pub use events::{LedgerEvent, LedgerEventKind};
pub use ports::{
    AccessPolicy, DecryptionOracle, DonationLedgerApi, HomomorphicArithmetic,
    LedgerEventPublisher, ProofVerifier, PublishError, TimeSource,
};
pub use service::{DonationLedgerService, LedgerDependencies, LedgerStats};
pub use store::LedgerStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
