//! # Algorithms Module
//!
//! Cleartext decoding and name-hash lookup.

pub mod cleartext;
pub mod name_hash;

pub use cleartext::{CleartextCodec, DonationCleartext};
pub use name_hash::{check_no_collision, lookup_by_hash, name_hash};
