//! # Aggregate Store
//!
//! Encrypted running totals per entity and per donor, plus the
//! discovery-ordered name lists backing hash lookups.
//!
//! Folding is split in two: [`AggregateStore::prepare_fold`] does every
//! fallible step (collision checks, arithmetic calls) without touching the
//! store, and [`AggregateStore::commit_fold`] applies the result and cannot
//! fail. Callers that must stay all-or-nothing prepare first and commit only
//! after their own checks pass.

use crate::algorithms::name_hash::check_no_collision_with;
use crate::algorithms::{lookup_by_hash, name_hash};
use crate::domain::{
    AggregateKey, AggregateKind, CiphertextHandle, EncryptedAggregate, LedgerError, NameHash,
};
use crate::ports::outbound::HomomorphicArithmetic;
use std::collections::HashMap;
use tracing::debug;

/// New total for one aggregate, computed but not yet stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedFold {
    /// Aggregate being updated.
    pub key: AggregateKey,
    /// Total after the fold.
    pub new_total: CiphertextHandle,
    /// Whether this fold creates the aggregate.
    pub first_contribution: bool,
}

/// Folds for the entity and the donor of one revealed donation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldPlan {
    /// Entity total update.
    pub entity: PreparedFold,
    /// Donor total update.
    pub donor: PreparedFold,
}

/// Entity and donor running totals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateStore {
    entities: HashMap<String, EncryptedAggregate>,
    donors: HashMap<String, EncryptedAggregate>,
    entity_names: Vec<String>,
    donor_names: Vec<String>,
}

impl AggregateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn totals(&self, kind: AggregateKind) -> &HashMap<String, EncryptedAggregate> {
        match kind {
            AggregateKind::Entity => &self.entities,
            AggregateKind::Donor => &self.donors,
        }
    }

    fn totals_mut(&mut self, kind: AggregateKind) -> &mut HashMap<String, EncryptedAggregate> {
        match kind {
            AggregateKind::Entity => &mut self.entities,
            AggregateKind::Donor => &mut self.donors,
        }
    }

    /// Names in discovery order.
    pub fn names(&self, kind: AggregateKind) -> &[String] {
        match kind {
            AggregateKind::Entity => &self.entity_names,
            AggregateKind::Donor => &self.donor_names,
        }
    }

    fn names_mut(&mut self, kind: AggregateKind) -> &mut Vec<String> {
        match kind {
            AggregateKind::Entity => &mut self.entity_names,
            AggregateKind::Donor => &mut self.donor_names,
        }
    }

    /// Aggregate for `key`, if any donation has been folded into it.
    pub fn get(&self, key: &AggregateKey) -> Option<&EncryptedAggregate> {
        self.totals(key.kind).get(&key.name)
    }

    /// Recover a registered name from its hash.
    pub fn lookup_by_hash(&self, kind: AggregateKind, hash: &NameHash) -> Result<&str, LedgerError> {
        lookup_by_hash(kind, self.names(kind), hash)
    }

    async fn prepare_one<A, F>(
        &self,
        arithmetic: &A,
        key: AggregateKey,
        encoded: CiphertextHandle,
        hash_fn: &F,
    ) -> Result<PreparedFold, LedgerError>
    where
        A: HomomorphicArithmetic + ?Sized,
        F: Fn(&str) -> NameHash + Sync,
    {
        let (base, first_contribution) = match self.get(&key) {
            Some(existing) => (existing.total, false),
            None => {
                check_no_collision_with(key.kind, self.names(key.kind), &key.name, hash_fn)?;
                (arithmetic.zero().await?, true)
            }
        };
        let new_total = arithmetic.add(base, encoded).await?;
        Ok(PreparedFold {
            key,
            new_total,
            first_contribution,
        })
    }

    /// Compute the entity and donor folds for a revealed amount.
    ///
    /// Fails with `HashCollision` if a first-time name hashes like a
    /// registered distinct one. The store is not modified.
    pub async fn prepare_fold<A>(
        &self,
        arithmetic: &A,
        entity: &str,
        donor: &str,
        amount: u32,
    ) -> Result<FoldPlan, LedgerError>
    where
        A: HomomorphicArithmetic + ?Sized,
    {
        self.prepare_fold_with(arithmetic, entity, donor, amount, name_hash)
            .await
    }

    /// [`AggregateStore::prepare_fold`] with an injectable name hash.
    pub(crate) async fn prepare_fold_with<A, F>(
        &self,
        arithmetic: &A,
        entity: &str,
        donor: &str,
        amount: u32,
        hash_fn: F,
    ) -> Result<FoldPlan, LedgerError>
    where
        A: HomomorphicArithmetic + ?Sized,
        F: Fn(&str) -> NameHash + Sync,
    {
        let encoded = arithmetic.encode(amount).await?;
        let entity = self
            .prepare_one(arithmetic, AggregateKey::entity(entity), encoded, &hash_fn)
            .await?;
        let donor = self
            .prepare_one(arithmetic, AggregateKey::donor(donor), encoded, &hash_fn)
            .await?;
        Ok(FoldPlan { entity, donor })
    }

    /// Apply a prepared plan.
    pub fn commit_fold(&mut self, plan: FoldPlan, now: u64) {
        for fold in [plan.entity, plan.donor] {
            self.apply(fold, now);
        }
    }

    fn apply(&mut self, fold: PreparedFold, now: u64) {
        let PreparedFold {
            key,
            new_total,
            first_contribution,
        } = fold;

        if first_contribution && !self.names(key.kind).contains(&key.name) {
            self.names_mut(key.kind).push(key.name.clone());
        }
        let entry = self
            .totals_mut(key.kind)
            .entry(key.name.clone())
            .or_insert(EncryptedAggregate {
                total: new_total,
                contributions: 0,
                revealed_total: None,
                updated_at: now,
            });
        entry.total = new_total;
        entry.contributions += 1;
        entry.updated_at = now;

        debug!(
            "[ledger] Folded into {} (contributions={})",
            key, entry.contributions
        );
    }

    /// Prepare and commit in one step.
    pub async fn fold_reveal<A>(
        &mut self,
        arithmetic: &A,
        entity: &str,
        donor: &str,
        amount: u32,
        now: u64,
    ) -> Result<(), LedgerError>
    where
        A: HomomorphicArithmetic + ?Sized,
    {
        let plan = self.prepare_fold(arithmetic, entity, donor, amount).await?;
        self.commit_fold(plan, now);
        Ok(())
    }

    /// Record the cleartext total delivered by an aggregate decryption.
    pub fn set_revealed_total(
        &mut self,
        key: &AggregateKey,
        total: u32,
    ) -> Result<(), LedgerError> {
        let aggregate = self
            .totals_mut(key.kind)
            .get_mut(&key.name)
            .ok_or_else(|| LedgerError::NotFound {
                kind: key.kind,
                hash: name_hash(&key.name),
            })?;
        aggregate.revealed_total = Some(total);
        Ok(())
    }
}
