//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound port traits with in-memory and reference
//! services.

mod arithmetic;
mod clock;
mod oracle;
mod policy;
mod publisher;
mod verifier;

pub use arithmetic::TransparentArithmetic;
pub use clock::{FixedTimeSource, SystemTimeSource};
pub use oracle::InMemoryDecryptionOracle;
pub use policy::{AllowAllPolicy, RoleBasedPolicy};
pub use publisher::{NoOpPublisher, RecordingPublisher};
pub use verifier::HmacProofVerifier;
