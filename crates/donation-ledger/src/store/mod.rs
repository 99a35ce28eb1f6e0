//! # Ledger Store
//!
//! Owned state of the ledger. The service holds one `LedgerStore` and every
//! operation borrows it; there is no global state.

pub mod aggregates;
pub mod connections;
pub mod records;
pub mod requests;

pub use aggregates::{AggregateStore, FoldPlan, PreparedFold};
pub use connections::ConnectionLog;
pub use records::RecordStore;
pub use requests::RequestTracker;

/// Record store, aggregate store, request tracker and connection log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerStore {
    /// Encrypted donations and reveal slots.
    pub records: RecordStore,
    /// Entity/donor running totals.
    pub aggregates: AggregateStore,
    /// Oracle request tracking.
    pub requests: RequestTracker,
    /// Encrypted connection log.
    pub connections: ConnectionLog,
}

impl LedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
