//! Access Policy Adapters
//!
//! Implements `AccessPolicy`: allow-everything for open deployments and a
//! per-action allow list.

use crate::domain::{Address, LedgerAction, LedgerError};
use crate::ports::outbound::AccessPolicy;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Policy that authorizes every caller.
#[derive(Clone, Debug, Default)]
pub struct AllowAllPolicy;

impl AccessPolicy for AllowAllPolicy {
    fn authorize(&self, _caller: &Address, _action: LedgerAction) -> Result<(), LedgerError> {
        Ok(())
    }
}

/// Per-action allow lists.
#[derive(Clone, Debug, Default)]
pub struct RoleBasedPolicy {
    grants: HashMap<LedgerAction, HashSet<Address>>,
}

impl RoleBasedPolicy {
    /// Policy that denies everything until grants are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `caller` to perform `action`.
    pub fn grant(mut self, action: LedgerAction, caller: Address) -> Self {
        self.grants.entry(action).or_default().insert(caller);
        self
    }

    /// Allow `caller` to perform every action.
    pub fn grant_all(self, caller: Address) -> Self {
        [
            LedgerAction::RecordDonation,
            LedgerAction::RecordConnection,
            LedgerAction::RequestDecryption,
            LedgerAction::RequestAggregateDecryption,
            LedgerAction::FulfillDecryption,
        ]
        .into_iter()
        .fold(self, |policy, action| policy.grant(action, caller))
    }
}

impl AccessPolicy for RoleBasedPolicy {
    fn authorize(&self, caller: &Address, action: LedgerAction) -> Result<(), LedgerError> {
        let allowed = self
            .grants
            .get(&action)
            .is_some_and(|callers| callers.contains(caller));
        if !allowed {
            warn!(
                caller = %hex::encode(caller),
                ?action,
                "[ledger] Rejected unauthorized caller"
            );
            return Err(LedgerError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        Ok(())
    }
}
