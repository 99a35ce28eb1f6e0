//! # Encrypted Connection Log
//!
//! Append-only log of encrypted entity-to-entity edges.

use crate::domain::{CiphertextHandle, EncryptedConnection};

/// Append-only connection log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionLog {
    entries: Vec<EncryptedConnection>,
}

impl ConnectionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its 0-based index.
    pub fn append(
        &mut self,
        entity1: CiphertextHandle,
        entity2: CiphertextHandle,
        weight: CiphertextHandle,
        recorded_at: u64,
    ) -> usize {
        self.entries.push(EncryptedConnection {
            entity1,
            entity2,
            weight,
            recorded_at,
        });
        self.entries.len() - 1
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&EncryptedConnection> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_index() {
        let mut log = ConnectionLog::new();
        let a = log.append(CiphertextHandle([1; 32]), CiphertextHandle([2; 32]), CiphertextHandle([3; 32]), 5);
        let b = log.append(CiphertextHandle([4; 32]), CiphertextHandle([5; 32]), CiphertextHandle([6; 32]), 6);
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(log.get(1).unwrap().weight, CiphertextHandle([6; 32]));
        assert!(log.get(2).is_none());
    }
}
