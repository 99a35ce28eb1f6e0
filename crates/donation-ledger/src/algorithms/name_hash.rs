//! # Name Hashing
//!
//! Keccak-256 hashing of aggregate names and the reverse lookup over the
//! discovery-ordered name lists.
//!
//! The lookup is a linear scan that recomputes every entry's hash. There is
//! no reverse index: the scan order is the discovery order, and a second
//! distinct name hashing to the same value is reported as a collision instead
//! of being resolved to whichever came first.

use crate::domain::{AggregateKind, LedgerError, NameHash};
use sha3::{Digest, Keccak256};

/// Keccak-256 of the UTF-8 name bytes.
pub fn name_hash(name: &str) -> NameHash {
    let mut hasher = Keccak256::new();
    hasher.update(name.as_bytes());
    NameHash(hasher.finalize().into())
}

/// Recover a name from its hash by scanning `names` in order.
pub fn lookup_by_hash<'a>(
    kind: AggregateKind,
    names: &'a [String],
    hash: &NameHash,
) -> Result<&'a str, LedgerError> {
    lookup_by_hash_with(kind, names, hash, name_hash)
}

/// [`lookup_by_hash`] with an injectable hash function.
pub(crate) fn lookup_by_hash_with<'a, F>(
    kind: AggregateKind,
    names: &'a [String],
    hash: &NameHash,
    hash_fn: F,
) -> Result<&'a str, LedgerError>
where
    F: Fn(&str) -> NameHash,
{
    let mut found: Option<&'a str> = None;
    for name in names {
        if hash_fn(name) != *hash {
            continue;
        }
        match found {
            None => found = Some(name.as_str()),
            Some(existing) if existing != name.as_str() => {
                return Err(LedgerError::HashCollision {
                    kind,
                    existing: existing.to_string(),
                    incoming: name.clone(),
                });
            }
            Some(_) => {}
        }
    }
    found.ok_or(LedgerError::NotFound { kind, hash: *hash })
}

/// Reject a new name whose hash matches an already-registered distinct name.
pub fn check_no_collision(
    kind: AggregateKind,
    names: &[String],
    incoming: &str,
) -> Result<(), LedgerError> {
    check_no_collision_with(kind, names, incoming, name_hash)
}

/// [`check_no_collision`] with an injectable hash function.
pub(crate) fn check_no_collision_with<F>(
    kind: AggregateKind,
    names: &[String],
    incoming: &str,
    hash_fn: F,
) -> Result<(), LedgerError>
where
    F: Fn(&str) -> NameHash,
{
    let incoming_hash = hash_fn(incoming);
    for existing in names {
        if existing != incoming && hash_fn(existing) == incoming_hash {
            return Err(LedgerError::HashCollision {
                kind,
                existing: existing.clone(),
                incoming: incoming.to_string(),
            });
        }
    }
    Ok(())
}
